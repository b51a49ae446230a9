//! Analysis command handler
//!
//! Resolves the effective configuration, runs the analyzer over the input
//! file, and renders a run report.

use std::io::Write;

use serde::Serialize;
use tracing::{info, warn};

use logtally_analyzer::{LogAnalyzerBuilder, RunOutcome, SchemaKind};
use logtally_core::config::{IgnoredOverride, LogtallyConfig};

use crate::cli::Cli;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Effective configuration plus env overrides that could not be applied.
#[derive(Debug)]
pub struct ResolvedConfig {
    pub config: LogtallyConfig,
    pub ignored_overrides: Vec<IgnoredOverride>,
}

impl ResolvedConfig {
    /// Log the ignored env overrides. Call after `init_tracing`.
    pub fn warn_ignored(&self) {
        for ignored in &self.ignored_overrides {
            warn!(
                env_key = ignored.key,
                value = ignored.value.as_str(),
                expected = ignored.expected,
                "ignoring unparseable env override"
            );
        }
    }
}

/// Build the effective configuration.
///
/// Precedence: CLI flags > `LOGTALLY_*` environment variables > config file > defaults.
/// A missing config file is an error only when `--config` was given. Validation
/// runs once, after every layer has been applied.
pub async fn resolve_config(cli: &Cli) -> Result<ResolvedConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => LogtallyConfig::from_file(path).await?,
        None => LogtallyConfig::default(),
    };
    let ignored_overrides = config.apply_env_overrides();
    cli.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ResolvedConfig {
        config,
        ignored_overrides,
    })
}

/// Run the analysis and render the report.
///
/// The report is rendered even when some summaries failed to write; the
/// failure is returned afterwards so the process exits non-zero.
pub async fn execute(
    cli: &Cli,
    config: LogtallyConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let analyzer = LogAnalyzerBuilder::new().config(config).build()?;
    let outcome = analyzer.run(&cli.file).await?;

    let report = RunReport::from_outcome(&outcome);
    writer.render(&report)?;

    outcome.report.into_result()?;
    info!(input = %cli.file.display(), "analysis finished");
    Ok(())
}

/// Summary of one run, as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub input: String,
    pub lines: u64,
    pub schemas: Vec<SchemaLine>,
    pub unclassified: u64,
    pub oversized: u64,
    pub written: Vec<String>,
    pub failures: Vec<String>,
}

/// Per-schema counts in the run report.
#[derive(Debug, Serialize)]
pub struct SchemaLine {
    pub schema: SchemaKind,
    pub classified: u64,
    pub skipped: u64,
}

impl RunReport {
    pub fn from_outcome(outcome: &RunOutcome) -> Self {
        let schemas = SchemaKind::CLASSIFIED
            .iter()
            .filter_map(|&kind| {
                outcome.stats.counts(kind).map(|c| SchemaLine {
                    schema: kind,
                    classified: c.classified,
                    skipped: c.skipped,
                })
            })
            .collect();

        Self {
            input: outcome.input.display().to_string(),
            lines: outcome.stats.lines,
            schemas,
            unclassified: outcome.stats.unclassified,
            oversized: outcome.stats.oversized,
            written: outcome
                .report
                .written
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            failures: outcome.report.failures.clone(),
        }
    }
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Analysis: {}", self.input.bold())?;
        writeln!(w, "  Lines read: {}", self.lines)?;
        writeln!(w)?;
        writeln!(w, "{:<14} {:>12} {:>10}", "Schema", "Classified", "Skipped")?;
        writeln!(w, "{}", "-".repeat(38))?;
        for s in &self.schemas {
            let skipped = if s.skipped > 0 {
                s.skipped.to_string().yellow()
            } else {
                s.skipped.to_string().normal()
            };
            writeln!(
                w,
                "{:<14} {:>12} {:>10}",
                s.schema.as_str(),
                s.classified,
                skipped
            )?;
        }
        writeln!(w, "{:<14} {:>12}", "unclassified", self.unclassified)?;
        if self.oversized > 0 {
            writeln!(
                w,
                "  ({} oversized lines dropped before classification)",
                self.oversized.to_string().yellow()
            )?;
        }

        writeln!(w)?;
        for path in &self.written {
            writeln!(w, "  {} {}", "wrote".green(), path)?;
        }
        for failure in &self.failures {
            writeln!(w, "  {} {}", "failed".red().bold(), failure)?;
        }

        Ok(())
    }
}
