//! Configuration service implementation.
//!
//! Loads the [`ExplorerConfig`] from `config.toml` and resolves where the tree
//! document lives.

use crate::paths::ArborPaths;
use crate::storage::AtomicFile;
use arbor_core::{ExplorerConfig, Result};
use std::path::{Path, PathBuf};

/// Reads and writes the explorer configuration file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicFile,
    paths: ArborPaths,
}

impl ConfigService {
    /// Uses `config_file`, resolving defaults relative to `paths`.
    pub fn new(config_file: impl Into<PathBuf>, paths: ArborPaths) -> Self {
        Self {
            file: AtomicFile::new(config_file),
            paths,
        }
    }

    /// Uses the default `config.toml` under `paths`.
    pub fn from_paths(paths: ArborPaths) -> Self {
        Self::new(paths.config_file(), paths)
    }

    pub fn config_file(&self) -> &Path {
        self.file.path()
    }

    /// Loads the configuration.
    ///
    /// # Returns
    ///
    /// - `Ok(ExplorerConfig)`: the parsed file, or defaults if it is missing
    /// - `Err(ArborError::Serialization)`: the file is not valid TOML
    pub fn load(&self) -> Result<ExplorerConfig> {
        match self.file.load_toml::<ExplorerConfig>()? {
            Some(config) => {
                tracing::debug!(path = %self.file.path().display(), "Loaded configuration");
                Ok(config)
            }
            None => {
                tracing::debug!(
                    path = %self.file.path().display(),
                    "No configuration file, using defaults"
                );
                Ok(ExplorerConfig::default())
            }
        }
    }

    /// Writes the configuration back atomically.
    pub fn save(&self, config: &ExplorerConfig) -> Result<()> {
        self.file.save_toml(config)?;
        tracing::info!(path = %self.file.path().display(), "Saved configuration");
        Ok(())
    }

    /// Where the tree document lives: the configured `tree_file`, or the
    /// default next to the config file.
    pub fn tree_file(&self, config: &ExplorerConfig) -> PathBuf {
        config
            .tree_file
            .clone()
            .unwrap_or_else(|| self.paths.tree_file())
    }
}
