//! Command-line interface assigning delivery drivers to their nearest
//! micro-warehouse.
//!
//! `hubmatch assign <roster.csv>` geocodes every driver's address, picks the
//! geodesically nearest warehouse and prints a per-warehouse report.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod assign;
mod error;
mod fs;
mod output;
mod roster;

pub use error::CliError;

use assign::AssignArgs;

pub(crate) const ARG_ROSTER: &str = "roster";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_CATALOG: &str = "catalog";
pub(crate) const ARG_GEOCODER_URL: &str = "geocoder-url";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ARG_MAX_CONCURRENCY: &str = "max-concurrency";
pub(crate) const ARG_MAX_RETRIES: &str = "max-retries";
pub(crate) const ENV_ROSTER: &str = "HUBMATCH_CMDS_ASSIGN_ROSTER";

/// Run the hubmatch CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError::ArgumentParsing`] for invalid arguments (including
/// `--help` and `--version`, which clap reports as errors) and the
/// command's own error otherwise.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    match cli.command {
        Command::Assign(args) => assign::run_assign(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "hubmatch",
    about = "Assign delivery drivers to their nearest micro-warehouse",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Geocode a driver roster and assign each driver to a warehouse.
    Assign(AssignArgs),
}

#[cfg(test)]
mod tests;
