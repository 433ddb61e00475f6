//! Entry point for the `hubmatch` command-line interface.
#![forbid(unsafe_code)]

use hubmatch_cli::CliError;

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match hubmatch_cli::run() {
        Ok(()) => Ok(()),
        // Lets clap print help, version and usage errors with its own exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => Err(err.into()),
    }
}
