//! Command-line interface for SpaceFit livability analyses.
//!
//! `spacefit analyze <address>` geocodes the address through the Kakao Local
//! API, scores the surrounding area and prints the analysis as pretty JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod analyze;
mod error;

use analyze::{AnalyzeArgs, run_analyze};
pub use error::CliError;

const ARG_ADDRESS: &str = "address";
const ARG_CONFIG: &str = "config";
const ARG_FACILITIES: &str = "facilities";
const ARG_KAKAO_API_KEY: &str = "kakao-api-key";
const ARG_KAKAO_BASE_URL: &str = "kakao-base-url";
const ARG_OUTPUT: &str = "output";
const ENV_ADDRESS: &str = "SPACEFIT_CMDS_ANALYZE_ADDRESS";
const ENV_KAKAO_API_KEY: &str = "SPACEFIT_CMDS_ANALYZE_KAKAO_API_KEY";

/// Run the SpaceFit CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when argument parsing, configuration layering, the
/// analysis or writing its output fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Analyze(args) => run_analyze(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "spacefit",
    about = "Livability scoring and public-facility recommendations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score the area around an address and recommend public facilities.
    Analyze(AnalyzeArgs),
}

#[cfg(test)]
mod tests;
