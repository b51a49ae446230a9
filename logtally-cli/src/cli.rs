//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! Apart from [`Cli::apply_overrides`] it is purely declarative.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use logtally_core::config::LogtallyConfig;

/// logtally -- classify a mixed-format log file and summarize each schema.
///
/// Writes apm.json, application.json, and request.json into the output directory.
#[derive(Parser, Debug)]
#[command(name = "logtally", version, about, long_about = None)]
pub struct Cli {
    /// Input log file to analyze.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Path to a logtally.toml configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory the summary documents are written to.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Number of aggregation workers (1 = sequential).
    #[arg(long)]
    pub workers: Option<usize>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Run report format.
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings.
    pub fn apply_overrides(&self, config: &mut LogtallyConfig) {
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(workers) = self.workers {
            config.ingest.workers = workers;
        }
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
    }
}
