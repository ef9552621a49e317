//! CLI module for chunkwall.
//!
//! Parses arguments, installs the log subscriber and dispatches to the
//! command handlers.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;
use tracing_subscriber::EnvFilter;

use crate::error::ChunkwallError;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "CHUNKWALL_LOG";

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), ChunkwallError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.execute()
}

/// Log level selected by the number of `-v` flags.
const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr subscriber.
///
/// `-v` flags win over `CHUNKWALL_LOG`; without either only warnings show.
fn init_logging(verbosity: u8) {
    let filter = if verbosity > 0 {
        EnvFilter::new(level_for(verbosity))
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level_for(0)))
    };

    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(1), "info");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(3), "trace");
        assert_eq!(level_for(9), "trace");
    }
}
