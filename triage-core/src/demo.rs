//! Fixed demonstration batch behind the preview operation.

use crate::task::RawTask;

pub fn demo_tasks() -> Vec<RawTask> {
    vec![
        RawTask::new("demo_1", "Fix login bug")
            .with_due_date("2025-11-30")
            .with_hours(3.0)
            .with_importance(9),
        RawTask::new("demo_2", "Write documentation")
            .with_due_date("2025-12-15")
            .with_hours(5.0)
            .with_importance(6),
        RawTask::new("demo_3", "Refactor payment module")
            .with_due_date("2025-11-28")
            .with_hours(8.0)
            .with_importance(8),
    ]
}
