//! Plain-text rendering of reports for the terminal.

use std::fmt::Write;

use triage_core::{AnalysisReport, StrategyTable};

pub fn render_report(report: &AnalysisReport, limit: usize) -> String {
    let mut out = String::new();
    let shown = report.top(limit);

    let _ = writeln!(out, "# Ranked tasks (strategy: {})\n", report.strategy);
    if shown.is_empty() {
        out.push_str("(no tasks)\n");
        return out;
    }

    for (rank, t) in shown.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. [{:<6}] score={:.2} | {} | {}",
            rank + 1,
            t.priority_label,
            t.score,
            t.task.id,
            t.task.title
        );
        let _ = writeln!(
            out,
            "    urgency={:.2} importance={:.2} effort={:.2} dependency={:.2}",
            t.scores.urgency, t.scores.importance, t.scores.effort, t.scores.dependency
        );
        for reason in &t.reasons {
            let _ = writeln!(out, "    - {}", reason);
        }
    }

    if report.tasks.len() > shown.len() {
        let _ = writeln!(out, "\n... {} more (raise --limit)", report.tasks.len() - shown.len());
    }
    if let Some(note) = &report.note {
        let _ = writeln!(out, "\nNote: {}", note);
    }
    out
}

pub fn render_strategies(table: &StrategyTable) -> String {
    let mut out = String::new();
    let default = &table.default_strategy().name;
    let _ = writeln!(
        out,
        "{:<18} {:>7} {:>10} {:>6} {:>10}",
        "strategy", "urgency", "importance", "effort", "dependency"
    );
    for s in table.iter() {
        let marker = if &s.name == default { " (default)" } else { "" };
        let _ = writeln!(
            out,
            "{:<18} {:>7.2} {:>10.2} {:>6.2} {:>10.2}{}",
            s.name, s.weights.urgency, s.weights.importance, s.weights.effort, s.weights.dependency, marker
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use triage_core::RawTask;

    #[test]
    fn report_lists_rank_label_and_reasons() {
        let today = NaiveDate::from_ymd_opt(2025, 11, 27).unwrap();
        let report = AnalysisReport::preview(&StrategyTable::builtin(), None, Some(today));
        let text = render_report(&report, 10);

        assert!(text.contains("strategy: smart_balance"));
        assert!(text.contains(" 1. [High  ]"));
        assert!(text.contains("Fix login bug"));
        assert!(text.contains("- Marked as very important."));
        assert!(text.contains("Note:"));
    }

    #[test]
    fn report_truncates_to_limit() {
        let tasks: Vec<RawTask> = (0..5).map(|i| RawTask::new(format!("t{i}"), "x")).collect();
        let report = AnalysisReport::analyze(&StrategyTable::builtin(), &tasks, None, None);
        let text = render_report(&report, 2);
        assert!(text.contains(" 2. "));
        assert!(!text.contains(" 3. "));
        assert!(text.contains("3 more"));
    }

    #[test]
    fn strategies_mark_default() {
        let text = render_strategies(&StrategyTable::builtin());
        let line = text.lines().find(|l| l.starts_with("smart_balance")).unwrap();
        assert!(line.ends_with("(default)"));
        assert_eq!(text.lines().count(), 5);
    }
}
