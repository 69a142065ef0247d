use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Scenario file to run. Each line describes an initial document, a set of operations for
    /// the two sites, and the document both sites must converge to.
    pub scenario: Option<PathBuf>,
    /// Raise logging verbosity to debug.
    #[arg(long)]
    pub debug: bool,
}

#[test]
fn verify() {
    use clap::CommandFactory as _;
    Cli::command().debug_assert();
}
