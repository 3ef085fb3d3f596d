//! Field coercion: loose wire values into typed task fields.
//!
//! Every function here is total. A value that cannot be read degrades to the
//! field's neutral default; the scoring stage explains the default in the
//! task's reasons.

use serde_json::Value;

use crate::task::{ImportanceInput, RawTask, Task};
use crate::time::parse_due_date;

/// Normalize one raw record at position `index` (0-based) in the batch.
pub fn normalize(index: usize, raw: &RawTask) -> (Task, ImportanceInput) {
    let id = resolve_id(raw.id.as_ref(), index);
    let title = resolve_title(raw.title.as_ref(), &id);
    let importance = coerce_importance(raw.importance.as_ref());

    let task = Task {
        title,
        due_date: raw
            .due_date
            .as_ref()
            .and_then(Value::as_str)
            .and_then(parse_due_date),
        estimated_hours: coerce_hours(raw.estimated_hours.as_ref()),
        importance: importance.value(),
        dependencies: coerce_dependencies(raw.dependencies.as_ref()),
        id,
    };

    (task, importance)
}

/// Synthetic ids are `T<1-based position>`.
pub fn resolve_id(raw: Option<&Value>, index: usize) -> String {
    scalar_text(raw).unwrap_or_else(|| format!("T{}", index + 1))
}

pub fn resolve_title(raw: Option<&Value>, id: &str) -> String {
    scalar_text(raw).unwrap_or_else(|| format!("Task {id}"))
}

/// Known estimates are finite and non-negative.
pub fn coerce_hours(raw: Option<&Value>) -> Option<f64> {
    let hours = match raw? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (hours.is_finite() && hours >= 0.0).then_some(hours)
}

/// Integers pass through; floats truncate toward zero; strings must hold an integer.
pub fn coerce_importance(raw: Option<&Value>) -> ImportanceInput {
    let Some(value) = raw else {
        return ImportanceInput::Missing;
    };

    match value {
        Value::Null => ImportanceInput::Missing,
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ImportanceInput::Value(i)
            } else if n.as_u64().is_some() {
                ImportanceInput::Value(i64::MAX)
            } else {
                match n.as_f64() {
                    // `as` saturates at the i64 bounds.
                    Some(f) if f.is_finite() => ImportanceInput::Value(f.trunc() as i64),
                    _ => ImportanceInput::Invalid,
                }
            }
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => ImportanceInput::Value(i),
            Err(_) => ImportanceInput::Invalid,
        },
        _ => ImportanceInput::Invalid,
    }
}

/// Anything that is not a list means "no dependencies".
pub fn coerce_dependencies(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

fn scalar_text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn missing_id_and_title_are_synthesized() {
        let (task, _) = normalize(2, &RawTask::default());
        assert_eq!(task.id, "T3");
        assert_eq!(task.title, "Task T3");
    }

    #[test]
    fn blank_id_is_treated_as_missing() {
        assert_eq!(resolve_id(Some(&json!("  ")), 0), "T1");
        assert_eq!(resolve_id(Some(&json!(null)), 4), "T5");
        assert_eq!(resolve_id(Some(&json!(42)), 0), "42");
    }

    #[test]
    fn hours_accept_numbers_and_numeric_strings() {
        assert_eq!(coerce_hours(Some(&json!(3))), Some(3.0));
        assert_eq!(coerce_hours(Some(&json!(1.5))), Some(1.5));
        assert_eq!(coerce_hours(Some(&json!(" 2.25 "))), Some(2.25));
        assert_eq!(coerce_hours(Some(&json!(0))), Some(0.0));
    }

    #[test]
    fn hours_reject_garbage() {
        assert_eq!(coerce_hours(None), None);
        assert_eq!(coerce_hours(Some(&json!("a while"))), None);
        assert_eq!(coerce_hours(Some(&json!(-4))), None);
        assert_eq!(coerce_hours(Some(&json!("NaN"))), None);
        assert_eq!(coerce_hours(Some(&json!(true))), None);
        assert_eq!(coerce_hours(Some(&json!([1]))), None);
    }

    #[test]
    fn importance_variants() {
        assert_eq!(coerce_importance(None), ImportanceInput::Missing);
        assert_eq!(coerce_importance(Some(&json!(null))), ImportanceInput::Missing);
        assert_eq!(coerce_importance(Some(&json!(7))), ImportanceInput::Value(7));
        assert_eq!(coerce_importance(Some(&json!(7.9))), ImportanceInput::Value(7));
        assert_eq!(coerce_importance(Some(&json!(-2.5))), ImportanceInput::Value(-2));
        assert_eq!(coerce_importance(Some(&json!("9"))), ImportanceInput::Value(9));
        assert_eq!(coerce_importance(Some(&json!("7.5"))), ImportanceInput::Invalid);
        assert_eq!(coerce_importance(Some(&json!("high"))), ImportanceInput::Invalid);
        assert_eq!(coerce_importance(Some(&json!(false))), ImportanceInput::Invalid);
        assert_eq!(
            coerce_importance(Some(&json!(u64::MAX))),
            ImportanceInput::Value(i64::MAX)
        );
    }

    #[test]
    fn dependencies_keep_order_and_dangling_ids() {
        let deps = coerce_dependencies(Some(&json!(["b", 7, "ghost", "b", null, {"x": 1}])));
        assert_eq!(deps, vec!["b", "7", "ghost", "b"]);
    }

    #[test]
    fn non_list_dependencies_become_empty() {
        assert!(coerce_dependencies(Some(&json!("b"))).is_empty());
        assert!(coerce_dependencies(None).is_empty());
    }

    #[test]
    fn unparseable_due_date_is_dropped() {
        let raw = RawTask::new("a", "A").with_due_date("soon");
        let (task, _) = normalize(0, &raw);
        assert_eq!(task.due_date, None);

        let raw = RawTask::new("a", "A").with_due_date("2026-04-01");
        let (task, _) = normalize(0, &raw);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 4, 1));
    }

    #[test]
    fn invalid_importance_echoes_as_none() {
        let mut raw = RawTask::new("a", "A");
        raw.importance = Some(json!("very"));
        let (task, importance) = normalize(0, &raw);
        assert_eq!(task.importance, None);
        assert_eq!(importance, ImportanceInput::Invalid);
    }
}
