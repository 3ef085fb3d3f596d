//! Scoring engine: per-dimension signals, weighted aggregate, label, ranking.
//!
//! Each dimension is a pure function from task facts to a `Signal` (score
//! plus the reasons that explain it). Effort and dependency are batch
//! relative, so their batch context is computed once up front.
//!
//! Reasons are appended in a fixed order: urgency, importance, effort,
//! dependency, then the circular-dependency warning.

use std::fmt;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::coerce;
use crate::graph::GraphAnalysis;
use crate::strategy::StrategyTable;
use crate::task::{ImportanceInput, RawTask, Task};
use crate::time::{days_until, local_today};

pub const HIGH_THRESHOLD: f64 = 0.75;
pub const MEDIUM_THRESHOLD: f64 = 0.5;

pub const NO_DUE_DATE_URGENCY: f64 = 0.3;
pub const NEUTRAL_IMPORTANCE: f64 = 0.5;
pub const NEUTRAL_EFFORT: f64 = 0.5;
pub const UNIFORM_EFFORT: f64 = 0.6;
pub const QUICK_WIN_EFFORT: f64 = 0.8;

pub const CYCLE_WARNING: &str = "Warning: Task is part of a circular dependency.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriorityLabel {
    High,
    Medium,
    Low,
}

impl PriorityLabel {
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_THRESHOLD {
            PriorityLabel::High
        } else if score >= MEDIUM_THRESHOLD {
            PriorityLabel::Medium
        } else {
            PriorityLabel::Low
        }
    }
}

impl fmt::Display for PriorityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriorityLabel::High => "High",
            PriorityLabel::Medium => "Medium",
            PriorityLabel::Low => "Low",
        };
        f.pad(s)
    }
}

/// The four normalized dimension scores, each in [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DimensionScores {
    #[serde(rename = "urgency_score", serialize_with = "round4")]
    pub urgency: f64,
    #[serde(rename = "importance_score", serialize_with = "round4")]
    pub importance: f64,
    #[serde(rename = "effort_score", serialize_with = "round4")]
    pub effort: f64,
    #[serde(rename = "dependency_score", serialize_with = "round4")]
    pub dependency: f64,
}

/// One ranked, annotated task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,
    #[serde(flatten)]
    pub scores: DimensionScores,
    #[serde(serialize_with = "round4")]
    pub score: f64,
    pub priority_label: PriorityLabel,
    pub reasons: Vec<String>,
}

impl ScoredTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn has_reason(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.reasons.iter().any(|r| r.to_lowercase().contains(&needle))
    }
}

/// Scores are kept at full precision; only the wire form is rounded.
fn round4<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 10_000.0).round() / 10_000.0)
}

/// A dimension score and the reasons behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub value: f64,
    pub reasons: Vec<String>,
}

impl Signal {
    fn quiet(value: f64) -> Self {
        Self {
            value,
            reasons: Vec::new(),
        }
    }

    fn noted(value: f64, reason: impl Into<String>) -> Self {
        Self {
            value,
            reasons: vec![reason.into()],
        }
    }

    fn and(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    /// Move the reasons into `out` and return the score.
    pub fn record(self, out: &mut Vec<String>) -> f64 {
        out.extend(self.reasons);
        self.value
    }
}

/// Urgency bands by days until due; each band includes its upper bound.
pub fn urgency_signal(due: Option<NaiveDate>, today: NaiveDate) -> Signal {
    let Some(due) = due else {
        return Signal::noted(
            NO_DUE_DATE_URGENCY,
            "No valid due date; treated as moderately urgent.",
        );
    };

    match days_until(due, today) {
        d if d < 0 => Signal::noted(1.0, "Task is overdue."),
        0 => Signal::noted(0.95, "Task is due today."),
        d if d <= 3 => Signal::noted(0.85, "Task is due within 3 days."),
        d if d <= 7 => Signal::noted(0.7, "Task is due within a week."),
        d if d <= 14 => Signal::quiet(0.5),
        d if d <= 30 => Signal::quiet(0.35),
        _ => Signal::quiet(0.2),
    }
}

/// Importance on a 1-10 scale mapped to [0.1, 1.0].
pub fn importance_signal(input: ImportanceInput) -> Signal {
    let raw = match input {
        ImportanceInput::Missing => {
            return Signal::noted(
                NEUTRAL_IMPORTANCE,
                "Importance not provided; using neutral value.",
            );
        }
        ImportanceInput::Invalid => {
            return Signal::noted(NEUTRAL_IMPORTANCE, "Importance invalid; using neutral value.");
        }
        ImportanceInput::Value(v) => v,
    };

    let clamped = raw.clamp(1, 10);
    let mut signal = Signal::quiet(clamped as f64 / 10.0);
    if clamped != raw {
        signal = signal.and("Importance out of 1-10 range; clamped and normalized.");
    }
    if clamped >= 8 {
        signal = signal.and("Marked as very important.");
    } else if clamped <= 3 {
        signal = signal.and("Task has relatively low importance.");
    }
    signal
}

/// Batch context for the effort dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffortScale {
    /// No task in the batch carries an estimate.
    NoEstimates,
    /// Every estimate is the same.
    Uniform,
    Range { min: f64, max: f64 },
}

impl EffortScale {
    pub fn from_hours(hours: impl IntoIterator<Item = f64>) -> Self {
        let mut bounds: Option<(f64, f64)> = None;
        for h in hours {
            bounds = Some(match bounds {
                None => (h, h),
                Some((lo, hi)) => (lo.min(h), hi.max(h)),
            });
        }
        match bounds {
            None => EffortScale::NoEstimates,
            Some((min, max)) if max == min => EffortScale::Uniform,
            Some((min, max)) => EffortScale::Range { min, max },
        }
    }
}

/// Lower estimates score higher, relative to the batch extremes.
pub fn effort_signal(scale: EffortScale, hours: Option<f64>) -> Signal {
    let value = match (scale, hours) {
        (EffortScale::NoEstimates, _) => {
            return Signal::noted(
                NEUTRAL_EFFORT,
                "No effort estimates available; using neutral effort score.",
            );
        }
        (_, None) => {
            return Signal::noted(NEUTRAL_EFFORT, "No estimated hours; treating effort as medium.");
        }
        (EffortScale::Uniform, Some(_)) => UNIFORM_EFFORT,
        (EffortScale::Range { min, max }, Some(h)) => 1.0 - (h - min) / (max - min),
    };

    let signal = Signal::quiet(value);
    if value >= QUICK_WIN_EFFORT {
        signal.and("Quick win based on low estimated effort.")
    } else {
        signal
    }
}

/// Fan-in relative to the most depended-upon task in the batch.
pub fn dependency_signal(fan_in: usize, max_fan_in: usize) -> Signal {
    let value = if max_fan_in == 0 {
        0.0
    } else {
        fan_in as f64 / max_fan_in as f64
    };

    if fan_in > 0 {
        Signal::noted(
            value,
            format!("Blocks {fan_in} other task(s), so prioritized higher."),
        )
    } else {
        Signal::quiet(value)
    }
}

/// Score and rank a batch with the built-in strategy table.
///
/// `today` defaults to the host's local date.
pub fn analyze(tasks: &[RawTask], strategy: &str, today: Option<NaiveDate>) -> Vec<ScoredTask> {
    analyze_with(&StrategyTable::builtin(), tasks, Some(strategy), today)
}

/// Score and rank a batch against an explicit strategy table.
///
/// Never fails: malformed fields degrade to neutral scores with reasons,
/// and an unknown strategy name resolves to the table default.
pub fn analyze_with(
    table: &StrategyTable,
    tasks: &[RawTask],
    strategy: Option<&str>,
    today: Option<NaiveDate>,
) -> Vec<ScoredTask> {
    let today = today.unwrap_or_else(local_today);
    let strategy = table.resolve(strategy);

    let (tasks, importance): (Vec<Task>, Vec<ImportanceInput>) = tasks
        .iter()
        .enumerate()
        .map(|(i, raw)| coerce::normalize(i, raw))
        .unzip();

    let graph = GraphAnalysis::of(&tasks);
    let max_fan_in = graph.max_fan_in();
    let effort_scale = EffortScale::from_hours(tasks.iter().filter_map(|t| t.estimated_hours));

    let mut scored: Vec<ScoredTask> = tasks
        .into_iter()
        .zip(importance)
        .map(|(task, importance)| {
            let mut reasons = Vec::new();
            let scores = DimensionScores {
                urgency: urgency_signal(task.due_date, today).record(&mut reasons),
                importance: importance_signal(importance).record(&mut reasons),
                effort: effort_signal(effort_scale, task.estimated_hours).record(&mut reasons),
                dependency: dependency_signal(graph.fan_in_of(&task.id), max_fan_in)
                    .record(&mut reasons),
            };
            if graph.in_cycle(&task.id) {
                reasons.push(CYCLE_WARNING.to_string());
            }

            let score = strategy.weights.combine(&scores);
            ScoredTask {
                task,
                scores,
                score,
                priority_label: PriorityLabel::from_score(score),
                reasons,
            }
        })
        .collect();

    // Stable: equal scores keep input order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    debug!(
        tasks = scored.len(),
        strategy = %strategy.name,
        %today,
        cycle_members = graph.cycle_members.len(),
        max_fan_in,
        "analyzed task batch"
    );

    scored
}
