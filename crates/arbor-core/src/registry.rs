//! Kind registry: maps type tags to node factories.
//!
//! Persisted nodes carry only a tag; the registry turns that tag back into a
//! concrete node without a central match over every kind. Kinds register
//! themselves through their module's `register` function, and the registry
//! is passed explicitly to whatever needs it so tests can build isolated ones.

use crate::error::{ArborError, Result};
use crate::node::{KindDescriptor, Node};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a fresh node of one kind from its label.
///
/// The factory runs kind-specific initialization, including hook wiring and
/// derived display state. Restored properties are applied afterwards.
pub type NodeFactory = Arc<dyn Fn(String) -> Node + Send + Sync>;

struct Registration {
    factory: NodeFactory,
    descriptor: Option<&'static KindDescriptor>,
}

/// Tag-to-factory table.
#[derive(Default)]
pub struct KindRegistry {
    kinds: HashMap<String, Registration>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `tag` to `factory`.
    ///
    /// Re-registering an existing tag replaces the earlier factory and logs a
    /// warning.
    pub fn register<F>(&mut self, tag: impl Into<String>, factory: F)
    where
        F: Fn(String) -> Node + Send + Sync + 'static,
    {
        self.insert(tag.into(), Arc::new(factory), None);
    }

    /// Registers a kind under its descriptor's tag.
    pub fn register_kind<F>(&mut self, descriptor: &'static KindDescriptor, factory: F)
    where
        F: Fn(String) -> Node + Send + Sync + 'static,
    {
        self.insert(descriptor.tag.to_string(), Arc::new(factory), Some(descriptor));
    }

    fn insert(
        &mut self,
        tag: String,
        factory: NodeFactory,
        descriptor: Option<&'static KindDescriptor>,
    ) {
        if self.kinds.contains_key(&tag) {
            tracing::warn!(kind = %tag, "Kind already registered, overwriting factory");
        } else {
            tracing::debug!(kind = %tag, "Registered node kind");
        }
        self.kinds.insert(
            tag,
            Registration {
                factory,
                descriptor,
            },
        );
    }

    pub fn get(&self, tag: &str) -> Option<NodeFactory> {
        self.kinds.get(tag).map(|r| r.factory.clone())
    }

    pub fn has(&self, tag: &str) -> bool {
        self.kinds.contains_key(tag)
    }

    /// The descriptor a kind was registered with, if it was registered via
    /// [`KindRegistry::register_kind`].
    pub fn descriptor(&self, tag: &str) -> Option<&'static KindDescriptor> {
        self.kinds.get(tag).and_then(|r| r.descriptor)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.kinds.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The tag for a node, derived from its concrete kind.
    pub fn type_name_of(&self, node: &Node) -> &'static str {
        node.kind_tag()
    }

    /// Creates a node of kind `tag`.
    pub fn create(&self, tag: &str, label: impl Into<String>) -> Result<Node> {
        let factory = self
            .get(tag)
            .ok_or_else(|| ArborError::UnknownKind(tag.to_string()))?;
        Ok(factory(label.into()))
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.tags())
            .finish()
    }
}
