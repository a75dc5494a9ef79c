//! Infrastructure layer for Arbor.
//!
//! Turns the in-memory forest into a durable document and back: the tree
//! serializer with its migration chain, the JSON file store, and TOML
//! configuration loading.

pub mod config_service;
pub mod paths;
pub mod serialization;
pub mod storage;

pub use config_service::ConfigService;
pub use paths::ArborPaths;
pub use serialization::{
    CURRENT_VERSION, DocumentMigration, MigrationChain, SerializedNode, SerializedTree,
    TreeSerializer,
};
pub use storage::{AtomicFile, JsonFileTreeStore};
