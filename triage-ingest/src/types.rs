use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use triage_core::RawTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("json") => Ok(InputFormat::Json),
            Some("csv") => Ok(InputFormat::Csv),
            Some(other) => bail!("unsupported task file extension '.{other}' (use .json or .csv)"),
            None => bail!("cannot infer format of {} (use .json or .csv)", path.display()),
        }
    }
}

/// One analysis request: the task records plus the strategy named alongside them, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskBatch {
    pub tasks: Vec<RawTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl TaskBatch {
    pub fn new(tasks: Vec<RawTask>) -> Self {
        Self {
            tasks,
            strategy: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
