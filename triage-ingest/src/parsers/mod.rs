pub mod csv_tasks;
pub mod json;

pub use csv_tasks::parse_tasks_csv;
pub use json::parse_tasks_json;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::types::{InputFormat, TaskBatch};

/// Read a task file, choosing the parser from its extension.
pub fn load_tasks(path: impl AsRef<Path>) -> Result<TaskBatch> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path)?;
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;

    let batch = match format {
        InputFormat::Json => parse_tasks_json(&text),
        InputFormat::Csv => parse_tasks_csv(&text),
    }
    .with_context(|| format!("parsing {}", path.display()))?;

    debug!(path = %path.display(), ?format, tasks = batch.len(), "loaded task batch");
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Per-test directory under the system temp dir, removed on drop.
    struct Scratch(PathBuf);

    impl Scratch {
        fn new(test: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("triage-ingest-{}-{test}", std::process::id()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn file(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.0.join(name);
            fs::write(&path, contents).unwrap();
            path
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn load_dispatches_on_extension() {
        let scratch = Scratch::new("dispatch");
        let json = scratch.file("batch.json", r#"{"tasks": [{"title": "a"}], "strategy": "high_impact"}"#);
        let batch = load_tasks(&json).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.strategy.as_deref(), Some("high_impact"));

        let csv = scratch.file("batch.csv", "title\na\nb\n");
        assert_eq!(load_tasks(&csv).unwrap().len(), 2);
    }

    #[test]
    fn load_reports_path_on_failure() {
        let scratch = Scratch::new("failure");
        let bad = scratch.file("broken.json", "{");
        let err = load_tasks(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));

        assert!(load_tasks("does/not/exist.json").is_err());
    }

    #[test]
    fn scratch_files_are_removed() {
        let dir = {
            let scratch = Scratch::new("cleanup");
            let path = scratch.file("gone.csv", "title\nx\n");
            assert!(path.exists());
            scratch.0.clone()
        };
        assert!(!dir.exists());
    }
}
