use anyhow::{Context, Result};
use clap::Parser;
use jupiter_ot::cli::Cli;
use jupiter_ot::{harness, logging};
use std::fs;
use std::process::ExitCode;
use tracing::info;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(cli.debug);

    let Some(path) = cli.scenario else {
        eprintln!("Usage: jupiter-ot SCENARIO-FILE");
        return ExitCode::FAILURE;
    };

    match run(&path) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &std::path::Path) -> Result<harness::ScenarioSummary> {
    info!(path = %path.display(), "running scenario file");
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading scenario file {}", path.display()))?;
    let stdout = std::io::stdout();
    let summary = harness::run_file(&contents, stdout.lock())
        .with_context(|| format!("running scenario file {}", path.display()))?;
    Ok(summary)
}
