use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use triage_core::{Strategy, StrategyTable, DEFAULT_STRATEGY};

use crate::state::ensure_triage_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisSection,

    /// Extra strategies layered over the built-in table.
    #[serde(default)]
    pub strategies: Vec<Strategy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Used when neither the command line nor the task file names a strategy.
    pub default_strategy: String,
    /// IANA zone used to decide what "today" is.
    pub timezone: String,
    /// Rows printed by `analyze` in table mode.
    pub limit: usize,
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            default_strategy: DEFAULT_STRATEGY.to_string(),
            timezone: "UTC".to_string(),
            limit: 20,
        }
    }
}

impl Config {
    /// Built-in table plus configured strategies, with the configured default.
    pub fn strategy_table(&self) -> Result<StrategyTable> {
        let mut table = StrategyTable::builtin();
        for s in &self.strategies {
            table = table
                .with_strategy(s.name.clone(), s.weights)
                .context("invalid [[strategies]] entry in config.toml")?;
        }
        table
            .with_default(&self.analysis.default_strategy)
            .context("invalid analysis.default_strategy in config.toml")
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_triage_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
