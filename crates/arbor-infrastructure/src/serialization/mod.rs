//! Tree document format, (de)serialization, and forward migrations.
//!
//! The document is versioned JSON:
//!
//! ```json
//! { "version": 1, "savedAt": "2024-05-01T12:00:00Z", "nodes": [ … ] }
//! ```

pub mod document;
pub mod migration;
pub mod serializer;

pub use document::{SerializedNode, SerializedTree};
pub use migration::{DocumentMigration, MigrationChain};
pub use serializer::{CURRENT_VERSION, TreeSerializer};
