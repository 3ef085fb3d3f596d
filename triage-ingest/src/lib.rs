//! triage-ingest: load raw task batches from JSON request bodies and CSV exports.
//!
//! Only structural problems are errors here (unreadable file, a top level that
//! is not a list of records). Field-level oddities are passed through to the
//! core, which degrades them itself.

pub mod parsers;
pub mod types;

pub use parsers::{load_tasks, parse_tasks_csv, parse_tasks_json};
pub use types::{InputFormat, TaskBatch};
