//! Response shapes handed to whatever serializes results for a client.

use chrono::NaiveDate;
use serde::Serialize;

use crate::demo;
use crate::scoring::{analyze_with, ScoredTask};
use crate::strategy::StrategyTable;
use crate::task::RawTask;

const PREVIEW_LIMIT: usize = 3;
const PREVIEW_NOTE: &str =
    "Preview uses a fixed demonstration task set, not stored user tasks.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Strategy name as requested; an unknown name is echoed, not rewritten.
    pub strategy: String,
    /// Strategy whose weights were actually applied.
    pub applied_strategy: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strategies_available: Vec<String>,
    pub tasks: Vec<ScoredTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl AnalysisReport {
    /// Rank a caller-supplied batch.
    pub fn analyze(
        table: &StrategyTable,
        tasks: &[RawTask],
        strategy: Option<&str>,
        today: Option<NaiveDate>,
    ) -> Self {
        let (applied, note) = table.resolve_noting(strategy);
        let requested = strategy.map_or_else(|| applied.name.clone(), str::to_string);

        Self {
            tasks: analyze_with(table, tasks, Some(applied.name.as_str()), today),
            strategy: requested,
            applied_strategy: applied.name.clone(),
            strategies_available: table.names().into_iter().map(str::to_string).collect(),
            note,
        }
    }

    /// Top three of the demonstration set under `strategy`.
    pub fn preview(table: &StrategyTable, strategy: Option<&str>, today: Option<NaiveDate>) -> Self {
        let mut report = Self::analyze(table, &demo::demo_tasks(), strategy, today);
        report.tasks.truncate(PREVIEW_LIMIT);
        report.strategies_available.clear();
        report.note = Some(match report.note.take() {
            Some(fallback) => format!("{fallback} {PREVIEW_NOTE}"),
            None => PREVIEW_NOTE.to_string(),
        });
        report
    }

    pub fn top(&self, n: usize) -> &[ScoredTask] {
        &self.tasks[..n.min(self.tasks.len())]
    }
}
