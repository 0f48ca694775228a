//! Handles settings for the application.
//!
//! Values come from an optional TOML file (`config/spendlog.toml` unless
//! `--config` says otherwise), then `SPENDLOG_*` environment variables
//! (`SPENDLOG_APP__LEVEL=debug`), then command-line flags.
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/spendlog.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    pub seed_sample_data: bool,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            seed_sample_data: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scheduler {
    /// Delay before the recompute worker picks up the newest filter edit.
    pub settle_ms: u64,
}

impl Scheduler {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub scheduler: Scheduler,
}

#[derive(Debug, Parser)]
#[command(name = "spendlog", about = "Track expenses from the terminal")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,
    /// Start with the demo expenses.
    #[arg(long, conflicts_with = "no_seed")]
    seed: bool,
    /// Start with an empty ledger.
    #[arg(long)]
    no_seed: bool,
    /// Override the recompute settle delay in milliseconds.
    #[arg(long)]
    settle_ms: Option<u64>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("SPENDLOG").separator("__"))
            .build()?
            .try_deserialize()?;

        if let Some(level) = args.level {
            settings.app.level = level;
        }
        if args.seed {
            settings.app.seed_sample_data = true;
        }
        if args.no_seed {
            settings.app.seed_sample_data = false;
        }
        if let Some(settle_ms) = args.settle_ms {
            settings.scheduler.settle_ms = settle_ms;
        }

        Ok(settings)
    }
}
