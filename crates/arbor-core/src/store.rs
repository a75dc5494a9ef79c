//! Persistence sink for the serialized tree document.

use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Load/save of the raw JSON document.
///
/// Implementations decide where the bytes land; the explorer only hands over
/// complete documents.
#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Returns the stored document.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: a document was stored
    /// - `Ok(None)`: nothing saved yet
    /// - `Err(_)`: the store could not be read
    async fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored document.
    async fn save(&self, document: &str) -> Result<()>;
}

/// Keeps the document in memory. Used for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryTreeStore {
    document: RwLock<Option<String>>,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: RwLock::new(Some(document.into())),
        }
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &str) -> Result<()> {
        *self.document.write().await = Some(document.to_string());
        Ok(())
    }
}
