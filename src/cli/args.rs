//! CLI argument definitions using clap
//!
//! Commands:
//! - students-api init --config <path>
//! - students-api serve --config <path>
//!
//! `--config` falls back to the `CONFIG_PATH` environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Students API - JSON CRUD over a SQLite `students` table
#[derive(Parser, Debug)]
#[command(name = "students-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the storage file and table if absent
    Init {
        /// Path to configuration file
        #[arg(long, env = "CONFIG_PATH")]
        config: Option<PathBuf>,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, env = "CONFIG_PATH")]
        config: Option<PathBuf>,
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
    fn test_parse_serve_with_config() {
        let cli = Cli::try_parse_from(["students-api", "serve", "--config", "local.json"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, Some(PathBuf::from("local.json"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["students-api"]).is_err());
    }
}
