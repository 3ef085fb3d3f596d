//! Strategy table: named weight sets for combining dimension scores.
//!
//! The table is plain immutable data. Callers pick an entry by name and never
//! mutate it; extending the table produces a new value.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::scoring::DimensionScores;

pub const DEFAULT_STRATEGY: &str = "smart_balance";

const WEIGHT_TOLERANCE: f64 = 1e-6;

const BUILTIN: [(&str, Weights); 4] = [
    // Low-effort quick wins first
    ("fastest_wins", Weights::new(0.2, 0.3, 0.4, 0.1)),
    // Importance and unblocking power
    ("high_impact", Weights::new(0.2, 0.5, 0.1, 0.2)),
    // Deadlines above everything else
    ("deadline_driven", Weights::new(0.6, 0.2, 0.1, 0.1)),
    ("smart_balance", Weights::new(0.35, 0.35, 0.15, 0.15)),
];

/// Weights for urgency, importance, effort and dependency, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub urgency: f64,
    pub importance: f64,
    pub effort: f64,
    #[serde(alias = "dependencies")]
    pub dependency: f64,
}

impl Weights {
    pub const fn new(urgency: f64, importance: f64, effort: f64, dependency: f64) -> Self {
        Self {
            urgency,
            importance,
            effort,
            dependency,
        }
    }

    pub fn total(&self) -> f64 {
        self.urgency + self.importance + self.effort + self.dependency
    }

    /// Reject weight sets that could push an aggregate score outside [0,1].
    pub fn validate(&self) -> Result<()> {
        let parts = [
            ("urgency", self.urgency),
            ("importance", self.importance),
            ("effort", self.effort),
            ("dependency", self.dependency),
        ];
        for (name, w) in parts {
            if !w.is_finite() || w < 0.0 {
                bail!("weight '{name}' must be a non-negative number, got {w}");
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            bail!("weights must sum to 1.0, got {total:.6}");
        }
        Ok(())
    }

    /// Weighted sum of the four dimension scores.
    pub fn combine(&self, scores: &DimensionScores) -> f64 {
        self.urgency * scores.urgency
            + self.importance * scores.importance
            + self.effort * scores.effort
            + self.dependency * scores.dependency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    #[serde(flatten)]
    pub weights: Weights,
}

/// Ordered name -> weights lookup with a guaranteed default entry.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyTable {
    entries: Vec<Strategy>,
    default_index: usize,
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StrategyTable {
    /// The four built-in strategies, defaulting to `smart_balance`.
    pub fn builtin() -> Self {
        let entries: Vec<Strategy> = BUILTIN
            .iter()
            .map(|(name, weights)| Strategy {
                name: (*name).to_string(),
                weights: *weights,
            })
            .collect();
        let default_index = entries
            .iter()
            .position(|s| s.name == DEFAULT_STRATEGY)
            .unwrap_or(0);
        Self {
            entries,
            default_index,
        }
    }

    /// Add a strategy, or replace the one with the same name.
    pub fn with_strategy(mut self, name: impl Into<String>, weights: Weights) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            bail!("strategy name must not be empty");
        }
        weights
            .validate()
            .map_err(|e| anyhow::anyhow!("strategy '{name}': {e}"))?;

        match self.entries.iter_mut().find(|s| s.name == name) {
            Some(existing) => existing.weights = weights,
            None => self.entries.push(Strategy { name, weights }),
        }
        Ok(self)
    }

    /// Make an existing entry the fallback for unknown names.
    pub fn with_default(mut self, name: &str) -> Result<Self> {
        let Some(idx) = self.entries.iter().position(|s| s.name == name) else {
            bail!("unknown default strategy '{name}'");
        };
        self.default_index = idx;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Strategy> {
        self.entries.iter().find(|s| s.name == name)
    }

    pub fn default_strategy(&self) -> &Strategy {
        &self.entries[self.default_index]
    }

    /// Look up by name, falling back to the default. Never fails.
    pub fn resolve(&self, name: Option<&str>) -> &Strategy {
        self.resolve_noting(name).0
    }

    /// Like [`resolve`](Self::resolve), plus a human-readable note when an
    /// unknown name fell back to the default.
    pub fn resolve_noting(&self, name: Option<&str>) -> (&Strategy, Option<String>) {
        let Some(n) = name else {
            return (self.default_strategy(), None);
        };
        match self.get(n) {
            Some(s) => (s, None),
            None => {
                let fallback = self.default_strategy();
                warn!(requested = n, fallback = %fallback.name, "unknown strategy, using default");
                let note = format!("Unknown strategy '{n}'; using default '{}'.", fallback.name);
                (fallback, Some(note))
            }
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
