//! Command line and runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::paths::Paths;

pub const DEFAULT_STALE_AFTER_DAYS: i64 = 1;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Terminal console for the support-ticket inbox.
#[derive(Parser, Debug)]
#[command(name = "ticket-desk", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,

    /// Directory holding the store, the notified set and the log file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Store document (overrides <data-dir>/store.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Watchdog notified set (overrides <data-dir>/notified.json)
    #[arg(long, global = true)]
    pub notified: Option<PathBuf>,

    /// Log file of the console (overrides <data-dir>/ticket-desk.log)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Whole days without activity before a pending ticket is stale
    #[arg(long, global = true, default_value_t = DEFAULT_STALE_AFTER_DAYS)]
    pub stale_after_days: i64,

    /// Seconds between watchdog sweeps
    #[arg(long, global = true, default_value_t = DEFAULT_SWEEP_INTERVAL_SECS)]
    pub sweep_interval_secs: u64,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Write a demo store document with admins and tickets.
    Seed {
        /// Overwrite an existing store document
        #[arg(long)]
        force: bool,
    },
    /// Run one watchdog sweep and print the report.
    Sweep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub paths: Paths,
    pub stale_after_days: i64,
    pub sweep_interval: Duration,
}

impl Config {
    /// Resolve file locations and watchdog settings from parsed flags.
    pub fn from_cli(cli: &Cli) -> Self {
        let mut paths = Paths::resolve(cli.data_dir.as_deref());
        if let Some(store) = &cli.store {
            paths.store = store.clone();
        }
        if let Some(notified) = &cli.notified {
            paths.notified = notified.clone();
        }
        if let Some(log_file) = &cli.log_file {
            paths.log_file = log_file.clone();
        }

        Self {
            paths,
            stale_after_days: cli.stale_after_days.max(0),
            // a zero period would make tokio's interval panic
            sweep_interval: Duration::from_secs(cli.sweep_interval_secs.max(1)),
        }
    }
}
