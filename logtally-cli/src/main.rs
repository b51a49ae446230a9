use clap::Parser;

use logtally_cli::analyze;
use logtally_cli::cli::Cli;
use logtally_cli::error::CliError;
use logtally_cli::logging::init_tracing;
use logtally_cli::output::OutputWriter;

#[tokio::main]
async fn main() {
    // usage errors exit here via clap, before any processing
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let resolved = analyze::resolve_config(&cli).await?;

    init_tracing(&resolved.config.general).map_err(|e| CliError::Command(e.to_string()))?;
    // env override problems are only visible once a subscriber is installed
    resolved.warn_ignored();
    logtally_core::metrics::describe_all();

    let config = resolved.config;

    tracing::info!(
        input = %cli.file.display(),
        output_dir = %config.output.dir.display(),
        "logtally starting"
    );

    let writer = OutputWriter::new(cli.output);
    analyze::execute(&cli, config, &writer).await
}
