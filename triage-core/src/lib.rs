//! triage-core: task prioritization engine.
//!
//! Turns a batch of loosely-typed task records into a ranked list with
//! per-dimension scores, a priority label and human-readable reasons, and
//! flags tasks caught in circular dependencies. Stateless: every call builds
//! and drops its own graph and score tables.

pub mod coerce;
pub mod demo;
pub mod graph;
pub mod report;
pub mod scoring;
pub mod strategy;
pub mod task;
pub mod time;

pub use graph::{fan_in, DependencyGraph, GraphAnalysis};
pub use report::AnalysisReport;
pub use scoring::{
    analyze, analyze_with, DimensionScores, EffortScale, PriorityLabel, ScoredTask, Signal,
    CYCLE_WARNING,
};
pub use strategy::{Strategy, StrategyTable, Weights, DEFAULT_STRATEGY};
pub use task::{ImportanceInput, RawTask, Task};
