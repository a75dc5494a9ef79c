//! Lifecycle operations and their subscribed handlers.

use super::forest::{Forest, NodeKey};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString};

/// The closed vocabulary of operations a node can opt into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum NodeOperation {
    AddChild,
    Remove,
    Refresh,
    View,
    Edit,
    Run,
    Stop,
    Open,
    Info,
    LoadChildren,
}

/// A handler invoked when its operation is fired on the owning node.
///
/// Handlers receive the whole forest so they can mutate siblings, children or
/// the node itself.
pub type HookHandler = Arc<dyn Fn(&mut Forest, NodeKey) -> Result<()> + Send + Sync>;

/// Per-operation handler lists, kept in registration order.
#[derive(Clone, Default)]
pub struct HookSet {
    handlers: HashMap<NodeOperation, Vec<HookHandler>>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler for `operation`.
    pub fn subscribe<F>(&mut self, operation: NodeOperation, handler: F)
    where
        F: Fn(&mut Forest, NodeKey) -> Result<()> + Send + Sync + 'static,
    {
        self.handlers
            .entry(operation)
            .or_default()
            .push(Arc::new(handler));
    }

    /// Returns true if at least one handler is subscribed to `operation`.
    pub fn has(&self, operation: NodeOperation) -> bool {
        self.handlers
            .get(&operation)
            .is_some_and(|handlers| !handlers.is_empty())
    }

    /// Returns the handlers for `operation`, in registration order.
    pub fn handlers(&self, operation: NodeOperation) -> Vec<HookHandler> {
        self.handlers.get(&operation).cloned().unwrap_or_default()
    }

    /// Lists operations with at least one handler, in declaration order.
    pub fn supported_operations(&self) -> Vec<NodeOperation> {
        use strum::IntoEnumIterator;
        NodeOperation::iter().filter(|op| self.has(*op)).collect()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("operations", &self.supported_operations())
            .finish()
    }
}
