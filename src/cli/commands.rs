//! CLI command implementations
//!
//! Boot order for `serve`: config, logging, storage, listener. Only a
//! failure before the listener is accepting is fatal.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::http_server::{shutdown_signal, HttpServer};
use crate::observability;
use crate::storage::SqliteStorage;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(config.as_deref()),
        Command::Serve { config } => serve(config.as_deref()),
    }
}

/// Create the storage file and `students` table.
///
/// Safe to run repeatedly; existing rows are left untouched.
pub fn init(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::resolve(config_path)?;
    let storage = SqliteStorage::open(&config.storage_path)?;
    let rows = storage.count()?;

    println!(
        "storage ready at {} ({} students)",
        config.storage_path.display(),
        rows
    );
    Ok(())
}

/// Open storage and serve HTTP until SIGINT/SIGTERM.
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::resolve(config_path)?;

    observability::init_logging(&config.env).map_err(|e| CliError::boot_failed(e.to_string()))?;

    let storage = SqliteStorage::open(&config.storage_path)?;
    info!(
        env = %config.env,
        version = env!("CARGO_PKG_VERSION"),
        "storage initialized"
    );

    let server = HttpServer::with_storage(config.http_server.clone(), Arc::new(storage));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start(shutdown_signal())
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_config(temp_dir: &TempDir) -> PathBuf {
        let config_path = temp_dir.path().join("config.json");
        let storage_path = temp_dir.path().join("storage").join("storage.db");

        let config = json!({
            "env": "dev",
            "storage_path": storage_path.to_string_lossy()
        });

        fs::write(&config_path, config.to_string()).unwrap();
        config_path
    }

    #[test]
    fn test_init_creates_storage() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        init(Some(config_path.as_path())).unwrap();
        assert!(temp_dir.path().join("storage").join("storage.db").exists());
    }

    #[test]
    fn test_init_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_config(&temp_dir);

        init(Some(config_path.as_path())).unwrap();
        init(Some(config_path.as_path())).unwrap();
    }

    #[test]
    fn test_serve_requires_config() {
        let err = serve(None).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
