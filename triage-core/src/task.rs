//! Task records: the loosely-typed input shape and its normalized form.
//!
//! `RawTask` mirrors what arrives over the wire. Every field is optional and
//! may carry the wrong JSON type; `crate::coerce` turns it into a `Task`
//! without ever failing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied task record, as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,
}

impl RawTask {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(Value::String(id.into())),
            title: Some(Value::String(title.into())),
            ..Self::default()
        }
    }

    pub fn with_due_date(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(Value::String(due.into()));
        self
    }

    pub fn with_due(self, due: NaiveDate) -> Self {
        self.with_due_date(due.format("%Y-%m-%d").to_string())
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(Value::from(hours));
        self
    }

    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Some(Value::from(importance));
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let deps: Vec<Value> = deps.into_iter().map(|d| Value::String(d.into())).collect();
        self.dependencies = Some(Value::Array(deps));
        self
    }
}

/// Normalized task, echoed back verbatim in the scored output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub importance: Option<i64>,
    /// Declared dependency ids, including ones that resolve to nothing.
    pub dependencies: Vec<String>,
}

/// How the importance field arrived. Missing and invalid are reported differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportanceInput {
    Missing,
    Invalid,
    Value(i64),
}

impl ImportanceInput {
    pub fn value(&self) -> Option<i64> {
        match self {
            ImportanceInput::Value(v) => Some(*v),
            _ => None,
        }
    }
}
