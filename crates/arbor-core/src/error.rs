//! Error types for the Arbor explorer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Arbor workspace.
///
/// Errors that only affect one node or subtree are logged and swallowed at the
/// point of failure; the variants here are what crosses a tree-wide boundary.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ArborError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// A kind tag that has no factory in the registry
    #[error("Unknown node kind: {0}")]
    UnknownKind(String),

    /// A persisted value that could not be applied to a node field
    #[error("Invalid value for {kind}.{field}: {message}")]
    InvalidProperty {
        kind: String,
        field: String,
        message: String,
    },

    /// The node already has an operation in flight
    #[error("Node '{node_id}' is busy ({operation} already in progress)")]
    Busy { node_id: String, operation: String },

    /// Structural tree error (cycles, dangling handles)
    #[error("Tree error: {0}")]
    Tree(String),

    /// Remote backend call failed
    #[error("Remote error: {0}")]
    Remote(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArborError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an InvalidProperty error
    pub fn invalid_property(
        kind: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidProperty {
            kind: kind.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a Busy error
    pub fn busy(node_id: impl Into<String>, operation: impl ToString) -> Self {
        Self::Busy {
            node_id: node_id.into(),
            operation: operation.to_string(),
        }
    }

    /// Creates a Tree error
    pub fn tree(message: impl Into<String>) -> Self {
        Self::Tree(message.into())
    }

    /// Creates a Remote error
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a Busy error
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    /// Check if this is a Remote error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ArborError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ArborError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ArborError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ArborError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Migration steps report through anyhow; the chain converts at its boundary.
impl From<anyhow::Error> for ArborError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{:#}", err))
    }
}

/// A type alias for `Result<T, ArborError>`.
pub type Result<T> = std::result::Result<T, ArborError>;
