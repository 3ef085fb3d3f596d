//! JSON task input.
//!
//! Two shapes are accepted:
//!   [ {task}, {task}, ... ]
//!   { "tasks": [ ... ], "strategy": "smart_balance" }

use anyhow::{bail, Context, Result};
use serde_json::Value;
use triage_core::RawTask;

use crate::types::TaskBatch;

pub fn parse_tasks_json(text: &str) -> Result<TaskBatch> {
    let root: Value = serde_json::from_str(text).context("invalid JSON")?;

    match root {
        Value::Array(items) => Ok(TaskBatch::new(records(items)?)),
        Value::Object(mut obj) => {
            let strategy = match obj.remove("strategy") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s),
                Some(other) => bail!("\"strategy\" must be a string, got {other}"),
            };
            let tasks = match obj.remove("tasks") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(items)) => records(items)?,
                Some(_) => bail!("\"tasks\" must be a list of task records"),
            };
            Ok(TaskBatch { tasks, strategy })
        }
        _ => bail!("expected a list of task records or an object with \"tasks\""),
    }
}

fn records(items: Vec<Value>) -> Result<Vec<RawTask>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| -> Result<RawTask> {
            if !item.is_object() {
                bail!("task record {} is not an object", i + 1);
            }
            serde_json::from_value(item).with_context(|| format!("task record {}", i + 1))
        })
        .collect()
}
