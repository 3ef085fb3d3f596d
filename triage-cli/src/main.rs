use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use triage_core::{time, AnalysisReport};
use triage_ingest::load_tasks;

mod config;
mod render;
mod state;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TRIAGE_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "triage",
    version,
    long_version = LONG_VERSION,
    about = "Rank tasks by urgency, importance, effort and dependency impact"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score and rank a task file (.json or .csv)
    Analyze {
        /// Task file: a JSON list, a JSON {"tasks": [...]} body, or a CSV export
        #[arg(long, short)]
        input: PathBuf,

        /// Strategy name (overrides any strategy named in the file)
        #[arg(long, short)]
        strategy: Option<String>,

        /// Reference date, YYYY-MM-DD (default: today in the configured timezone)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,

        /// Rows to print in table mode (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Preview the ranking of a fixed demonstration task set
    Suggest {
        #[arg(long, short)]
        strategy: Option<String>,

        #[arg(long)]
        today: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },

    /// List available strategies and their weights
    Strategies,

    /// Manage ~/.triage/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            input,
            strategy,
            today,
            json,
            limit,
        } => {
            let cfg = config::load_config()?;
            let table = cfg.strategy_table()?;
            let batch = load_tasks(&input)?;
            let today = resolve_today(today, &cfg)?;

            let strategy = strategy.or(batch.strategy);
            debug!(tasks = batch.tasks.len(), ?strategy, %today, "analyze");

            let report = AnalysisReport::analyze(&table, &batch.tasks, strategy.as_deref(), Some(today));
            emit(&report, json, limit.unwrap_or(cfg.analysis.limit))?;
        }

        Command::Suggest {
            strategy,
            today,
            json,
        } => {
            let cfg = config::load_config()?;
            let table = cfg.strategy_table()?;
            let today = resolve_today(today, &cfg)?;

            let report = AnalysisReport::preview(&table, strategy.as_deref(), Some(today));
            emit(&report, json, report.tasks.len())?;
        }

        Command::Strategies => {
            let table = config::load_config()?.strategy_table()?;
            print!("{}", render::render_strategies(&table));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}\n", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn resolve_today(explicit: Option<NaiveDate>, cfg: &config::Config) -> Result<NaiveDate> {
    match explicit {
        Some(d) => Ok(d),
        None => time::today_in(&cfg.analysis.timezone, Utc::now())
            .context("invalid analysis.timezone in config.toml"),
    }
}

fn emit(report: &AnalysisReport, json: bool, limit: usize) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render::render_report(report, limit));
    }
    Ok(())
}
