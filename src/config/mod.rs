//! Configuration loading and management for the Experience Consolidation Engine.
//!
//! This module loads the YAML configuration naming the person records file,
//! the historical ledger export, the summary store file, and the HTTP bind
//! address.
//!
//! # Example
//!
//! ```no_run
//! use experience_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/engine.yaml").unwrap();
//! println!("Summaries stored in: {}", config.summaries_path().display());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DEFAULT_BIND_ADDRESS, DataConfig, EngineConfig, ServerConfig};
