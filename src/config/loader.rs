//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Loads and provides access to the engine configuration.
///
/// # File Format
///
/// ```text
/// data:
///   persons_path: data/persons.yaml
///   ledger_path: data/historical_ledger.csv
///   summaries_path: data/summaries.json
/// server:
///   bind_address: 127.0.0.1:8080
/// ```
///
/// # Example
///
/// ```no_run
/// use experience_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/engine.yaml")?;
/// println!("Ledger: {}", loader.ledger_path().display());
/// # Ok::<(), experience_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Loads configuration from the specified file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or misses a required field (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: EngineConfig =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self { config, base_dir })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolved path of the person records file.
    pub fn persons_path(&self) -> PathBuf {
        self.resolve(&self.config.data.persons_path)
    }

    /// Resolved path of the historical ledger CSV.
    pub fn ledger_path(&self) -> PathBuf {
        self.resolve(&self.config.data.ledger_path)
    }

    /// Resolved path of the summary store file.
    pub fn summaries_path(&self) -> PathBuf {
        self.resolve(&self.config.data.summaries_path)
    }

    /// The address the HTTP server binds to.
    pub fn bind_address(&self) -> &str {
        &self.config.server.bind_address
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}
