//! CLI argument definitions using clap
//!
//! Commands:
//! - memorability analyze --events <path> [--config <path>]
//! - memorability abduce --events <path> [--config <path>] --event <id>
//! - memorability unusual --events <path> [--config <path>] --threshold <t>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Memorability - complexity, surprise and abduction over event logs
#[derive(Parser, Debug)]
#[command(name = "memorability")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Write INFO lifecycle logs alongside the response
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Inputs shared by every command
#[derive(Args, Debug, Clone)]
pub struct Source {
    /// Path to a JSON array of events
    #[arg(long)]
    pub events: PathBuf,

    /// Path to a search configuration file (defaults apply when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report complexity, recipe and surprise for every event
    Analyze {
        #[command(flatten)]
        source: Source,
    },

    /// Rank earlier events that best explain one event
    Abduce {
        #[command(flatten)]
        source: Source,

        /// Identifier of the consequence event
        #[arg(long)]
        event: u64,
    },

    /// List events whose surprise reaches a threshold
    Unusual {
        #[command(flatten)]
        source: Source,

        /// Minimum absolute surprise
        #[arg(long)]
        threshold: f64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_abduce() {
        let cli = Cli::try_parse_from([
            "memorability",
            "abduce",
            "--events",
            "log.json",
            "--event",
            "7",
        ])
        .unwrap();
        match cli.command {
            Command::Abduce { source, event } => {
                assert_eq!(source.events, PathBuf::from("log.json"));
                assert!(source.config.is_none());
                assert_eq!(event, 7);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["memorability", "analyze", "--events", "log.json", "--verbose"])
            .unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_unusual_requires_threshold() {
        assert!(Cli::try_parse_from(["memorability", "unusual", "--events", "log.json"]).is_err());
    }
}
