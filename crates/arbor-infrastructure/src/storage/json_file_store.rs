//! File-backed tree store.

use super::atomic_file::AtomicFile;
use arbor_core::{ArborError, Result, TreeStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Stores the tree document as a JSON file.
///
/// Writes are atomic (tmp + rename) and run on the blocking pool.
#[derive(Debug, Clone)]
pub struct JsonFileTreeStore {
    file: AtomicFile,
}

impl JsonFileTreeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: AtomicFile::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
impl TreeStore for JsonFileTreeStore {
    async fn load(&self) -> Result<Option<String>> {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.read())
            .await
            .map_err(|e| ArborError::internal(format!("Tree load task failed: {}", e)))?
    }

    async fn save(&self, document: &str) -> Result<()> {
        let file = self.file.clone();
        let document = document.to_string();
        tokio::task::spawn_blocking(move || file.write(&document))
            .await
            .map_err(|e| ArborError::internal(format!("Tree save task failed: {}", e)))?
    }
}
