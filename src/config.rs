//! Engine configuration.
//!
//! # Examples
//!
//! ```
//! use tridex::config::EngineConfig;
//! use tridex::storage::StorageConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.storage, StorageConfig::Memory);
//! assert!(!config.auto_commit);
//!
//! let config: EngineConfig = serde_json::from_str(
//!     r#"{"storage": {"type": "json", "path": "tridex.json"}, "auto_commit": true}"#,
//! ).unwrap();
//! assert!(config.auto_commit);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::StorageConfig;

/// Configuration for an [`Engine`](crate::engine::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Storage backend.
    pub storage: StorageConfig,
    /// Commit after every write operation.
    pub auto_commit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            storage: StorageConfig::Memory,
            auto_commit: false,
        }
    }
}

impl EngineConfig {
    /// Configuration for an in-memory engine.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Configuration for an engine snapshotting to a JSON file.
    pub fn json<P: Into<PathBuf>>(path: P) -> Self {
        EngineConfig {
            storage: StorageConfig::Json {
                path: path.into(),
                pretty: false,
            },
            ..Self::default()
        }
    }

    /// Pretty-print snapshots. Has no effect on memory storage.
    pub fn pretty(mut self, pretty: bool) -> Self {
        if let StorageConfig::Json { pretty: p, .. } = &mut self.storage {
            *p = pretty;
        }
        self
    }

    /// Commit after every write operation.
    pub fn auto_commit(mut self, auto_commit: bool) -> Self {
        self.auto_commit = auto_commit;
        self
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
