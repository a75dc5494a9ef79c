//! Domain core of the Arbor explorer.
//!
//! The explorer organizes local items (folders, notes, scripts) and cloud
//! resources in one persistent tree. This crate holds everything that does
//! not touch the disk: the polymorphic node model, the kind registry that
//! rebuilds nodes from persisted tags, the visibility pipeline, and the
//! paginated/cached remote listing every resource provider shares.

pub mod config;
pub mod context;
pub mod error;
pub mod kinds;
pub mod node;
pub mod registry;
pub mod remote;
pub mod store;
pub mod visibility;

// Re-export common types
pub use config::{ExplorerConfig, ViewSettings};
pub use context::{CallContext, ConfigProvider};
pub use error::{ArborError, Result};
pub use node::{Forest, KindDescriptor, Node, NodeKey, NodeKind, NodeOperation};
pub use registry::{KindRegistry, NodeFactory};
pub use store::{MemoryTreeStore, TreeStore};
pub use visibility::{TreeView, ViewFilter};
