/// Closet configuration
///
/// Defaults work without any setup: the catalog lives in the user's data
/// directory and uploads are scaled to 300px. An optional JSON file and the
/// `CLOSET_DB` environment variable override them.
///
/// Config file location:
/// - Linux: ~/.config/virtual-closet/config.json
/// - macOS: ~/Library/Application Support/virtual-closet/config.json
/// - Windows: %APPDATA%\virtual-closet\config.json

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClosetError, Result};
use crate::imaging::MAX_UPLOAD_DIMENSION;

const APP_DIR: &str = "virtual-closet";
const DB_FILE: &str = "closet.db";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "CLOSET_DB";

/// Where the catalog is kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLocation {
    /// SQLite database file, created on first open
    File(PathBuf),
    /// Private in-memory database, gone when the store is dropped
    Memory,
}

impl StorageLocation {
    /// The default database file in the user's data directory
    ///
    /// - Linux: ~/.local/share/virtual-closet/closet.db
    /// - macOS: ~/Library/Application Support/virtual-closet/closet.db
    /// - Windows: %APPDATA%\virtual-closet\closet.db
    ///
    /// Falls back to the working directory when no home can be determined.
    pub fn default_file() -> Self {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push(APP_DIR);
        path.push(DB_FILE);
        Self::File(path)
    }
}

impl Default for StorageLocation {
    fn default() -> Self {
        Self::default_file()
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => write!(f, ":memory:"),
        }
    }
}

/// All tunable settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosetConfig {
    /// Catalog database location
    pub database: StorageLocation,
    /// Uploads are scaled to fit within this many pixels per side
    pub max_upload_dimension: u32,
    /// Storage quota in SQLite pages (`PRAGMA max_page_count`); `None` = unlimited
    pub max_pages: Option<u32>,
}

impl Default for ClosetConfig {
    fn default() -> Self {
        Self {
            database: StorageLocation::default(),
            max_upload_dimension: MAX_UPLOAD_DIMENSION,
            max_pages: None,
        }
    }
}

impl ClosetConfig {
    /// Config backed by a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            database: StorageLocation::Memory,
            ..Self::default()
        }
    }

    /// Config backed by a database file at `path`
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            database: StorageLocation::File(path.into()),
            ..Self::default()
        }
    }

    /// Get the path where the config file is expected
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push(APP_DIR);
        path.push(CONFIG_FILE);
        Some(path)
    }

    /// Load from the default location, then apply environment overrides
    ///
    /// A missing config file is not an error.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        if let Some(db) = std::env::var_os(DB_PATH_ENV) {
            config.database = StorageLocation::File(PathBuf::from(db));
        }

        debug!(database = %config.database, "configuration loaded");
        Ok(config)
    }

    /// Parse a JSON config file; unspecified fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ClosetError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&text).map_err(|e| ClosetError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
