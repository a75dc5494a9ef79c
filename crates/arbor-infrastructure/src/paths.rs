//! Path resolution for arbor files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/arbor/        # Config directory (platform default)
//! ├── config.toml         # Explorer configuration
//! └── tree.json           # Persisted tree document
//! ```

use arbor_core::{ArborError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "arbor";
const CONFIG_FILE: &str = "config.toml";
const TREE_FILE: &str = "tree.json";

/// Resolves arbor's files, either under the platform config directory or
/// under an explicit base directory.
#[derive(Debug, Clone)]
pub struct ArborPaths {
    base_dir: PathBuf,
}

impl ArborPaths {
    /// Paths under the platform config directory (e.g. `~/.config/arbor/`).
    ///
    /// # Returns
    ///
    /// - `Ok(ArborPaths)`: resolved
    /// - `Err(ArborError::Config)`: the platform has no config directory
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ArborError::config("Cannot determine the config directory"))?;
        Ok(Self {
            base_dir: config_dir.join(APP_DIR),
        })
    }

    /// Paths under `base_dir` instead of the platform default.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    pub fn tree_file(&self) -> PathBuf {
        self.base_dir.join(TREE_FILE)
    }
}
