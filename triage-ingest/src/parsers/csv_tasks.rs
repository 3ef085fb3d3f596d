//! CSV task exports (spreadsheets, issue trackers).
//!
//! Expected header (any order, case-insensitive, unknown columns ignored):
//!   id,title,due_date,estimated_hours,importance,dependencies
//!
//! The dependencies cell holds ids separated by ';', ',' or '|'.

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde_json::Value;
use triage_core::RawTask;

use crate::types::TaskBatch;

const COLUMNS: [&str; 6] = [
    "id",
    "title",
    "due_date",
    "estimated_hours",
    "importance",
    "dependencies",
];

pub fn parse_tasks_csv(text: &str) -> Result<TaskBatch> {
    let dep_split = Regex::new(r"[;,|]")?;

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = rdr.headers().context("reading CSV header")?.clone();
    // column index for each of COLUMNS, if present
    let positions: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
        })
        .collect();

    if positions.iter().all(Option::is_none) {
        bail!("CSV header has none of the expected columns: {}", COLUMNS.join(","));
    }

    let mut tasks = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row + 2))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let cell = |col: usize| -> Option<String> {
            positions[col]
                .and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let dependencies = cell(5).map(|s| {
            Value::Array(
                dep_split
                    .split(&s)
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(|d| Value::String(d.to_string()))
                    .collect(),
            )
        });

        tasks.push(RawTask {
            id: cell(0).map(Value::String),
            title: cell(1).map(Value::String),
            due_date: cell(2).map(Value::String),
            estimated_hours: cell(3).map(Value::String),
            importance: cell(4).map(Value::String),
            dependencies,
        });
    }

    Ok(TaskBatch::new(tasks))
}
