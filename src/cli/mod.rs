// CLI module
// Command-line and environment configuration

mod args;

pub use args::{CliArgs, ConfigError, StoreBackend};

use clap::Parser;

/// Parse command-line arguments using clap
///
/// Values not given on the command line are read from the environment
/// (after `.env` has been loaded by the caller), then from the defaults.
/// On invalid arguments or `--help`, clap prints a message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
