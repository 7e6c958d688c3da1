//! CLI module for the students API
//!
//! Provides command-line interface for:
//! - init: Create the storage file and `students` table
//! - serve: Open storage and run the HTTP server until signalled

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use config::{Config, CONFIG_PATH_ENV};
pub use errors::{CliError, CliErrorCode, CliResult};
