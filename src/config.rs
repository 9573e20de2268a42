//! Runtime configuration shared by the CLI and the HTTP server.
//!
//! Values are resolved from built-in defaults, then a `.env` file, then
//! environment variables. Command-line flags are applied on top by the binary.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable overriding the database file location.
pub const DB_PATH_VAR: &str = "NOTES_DB_PATH";
/// Environment variable overriding the HTTP listen address.
pub const BIND_ADDR_VAR: &str = "NOTES_BIND_ADDR";

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Loads `.env` if present, then reads the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined and
    /// `NOTES_DB_PATH` is unset, or if `NOTES_BIND_ADDR` is not a socket
    /// address.
    pub fn from_env() -> Result<Self> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_vars()
    }

    /// Reads the environment without touching `.env`.
    pub fn from_vars() -> Result<Self> {
        let database_path = match std::env::var_os(DB_PATH_VAR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        let bind_addr = match std::env::var(BIND_ADDR_VAR) {
            Ok(addr) if !addr.trim().is_empty() => parse_bind_addr(&addr)?,
            _ => parse_bind_addr(DEFAULT_BIND_ADDR)?,
        };

        Ok(Self {
            database_path,
            bind_addr,
        })
    }

    /// Returns a copy with the given overrides applied.
    pub fn with_overrides(mut self, database_path: Option<PathBuf>, bind_addr: Option<SocketAddr>) -> Self {
        if let Some(path) = database_path {
            self.database_path = path;
        }
        if let Some(addr) = bind_addr {
            self.bind_addr = addr;
        }
        self
    }
}

/// Gets the cross-platform default database path.
///
/// Returns the path as `{data_dir}/notes/notes.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined.
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("notes").join("notes.db"))
}

/// Ensures the parent directory of the database file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_database_directory(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }
    Ok(())
}

fn parse_bind_addr(addr: &str) -> Result<SocketAddr> {
    addr.trim()
        .parse()
        .with_context(|| format!("Invalid bind address: {addr}"))
}
