//! CLI module for memorability
//!
//! Provides command-line interface for:
//! - analyze: Complexity, recipe and surprise for every event
//! - abduce: Ranked explanations for one event
//! - unusual: Events whose surprise reaches a threshold

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Source};
pub use commands::{abduce, analyze, run_command, unusual};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_events, write_error, write_response, EventRecord};

use crate::observability::{Logger, Severity};

/// Parse arguments and run the requested command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    // stdout carries the response; keep lifecycle lines off it unless asked
    if !cli.verbose {
        Logger::set_min_severity(Severity::Warn);
    }
    run_command(cli.command)
}
