//! Configuration types for the engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use std::path::PathBuf;

use serde::Deserialize;

/// Default address for the HTTP surface.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";

/// Locations of the engine's data files.
///
/// Relative paths are resolved against the directory holding the
/// configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// YAML list of person records with their form employment entries.
    pub persons_path: PathBuf,
    /// CSV export of the historical contract ledger.
    pub ledger_path: PathBuf,
    /// JSON file backing the summary store.
    pub summaries_path: PathBuf,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "0.0.0.0:8080".
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

/// The complete engine configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Data file locations.
    pub data: DataConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}
