//! Forest ↔ JSON document conversion.

use super::document::{SerializedNode, SerializedTree};
use super::migration::MigrationChain;
use arbor_core::node::serializable_fields;
use arbor_core::{Forest, KindRegistry, NodeKey, Result};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Version stamped on every written document.
pub const CURRENT_VERSION: u32 = 1;

/// Converts between the in-memory forest and the persisted document.
///
/// Reading never fails as a whole: unknown kinds and broken subtrees are
/// dropped and logged, a malformed document yields an empty forest.
#[derive(Debug, Clone)]
pub struct TreeSerializer {
    registry: Arc<KindRegistry>,
    migrations: MigrationChain,
}

impl TreeSerializer {
    pub fn new(registry: Arc<KindRegistry>) -> Self {
        Self {
            registry,
            migrations: MigrationChain::new(CURRENT_VERSION),
        }
    }

    /// Replaces the migration chain applied to older documents.
    pub fn with_migrations(mut self, migrations: MigrationChain) -> Self {
        self.migrations = migrations;
        self
    }

    pub fn registry(&self) -> &Arc<KindRegistry> {
        &self.registry
    }

    // ============================================================================
    // Writing
    // ============================================================================

    /// Serializes one node and its persistable descendants.
    ///
    /// Only declared, non-transient fields are written; fields without a
    /// value (or holding `null`) are left out.
    pub fn serialize_node(&self, forest: &Forest, key: NodeKey) -> Result<SerializedNode> {
        let node = forest.node(key)?;

        let mut properties = Map::new();
        for field in serializable_fields(node.descriptor()) {
            match node.get_property(field) {
                Some(Value::Null) | None => {}
                Some(value) => {
                    properties.insert(field.to_string(), value);
                }
            }
        }

        let mut children = Vec::new();
        for child in forest.children(key) {
            let persist = forest
                .get(child)
                .is_some_and(|node| node.kind().should_persist());
            if persist {
                children.push(self.serialize_node(forest, child)?.into_value()?);
            }
        }

        Ok(SerializedNode {
            kind: self.registry.type_name_of(node).to_string(),
            id: node.id().to_string(),
            label: node.label().to_string(),
            properties,
            children,
        })
    }

    /// Serializes the whole forest into a versioned JSON document.
    pub fn serialize_tree(&self, forest: &Forest) -> Result<String> {
        let mut nodes = Vec::with_capacity(forest.roots().len());
        for root in forest.roots() {
            let persist = forest
                .get(*root)
                .is_some_and(|node| node.kind().should_persist());
            if persist {
                nodes.push(self.serialize_node(forest, *root)?.into_value()?);
            }
        }

        let tree = SerializedTree {
            version: CURRENT_VERSION,
            saved_at: Some(Utc::now()),
            nodes,
        };
        Ok(serde_json::to_string_pretty(&tree)?)
    }

    // ============================================================================
    // Reading
    // ============================================================================

    /// Rebuilds one subtree into `forest` under `parent`.
    ///
    /// The kind factory runs first, so persisted properties always win over
    /// factory defaults. Returns `None` when the subtree was dropped: an
    /// unregistered kind, or a property that could not be applied.
    pub fn deserialize_node(
        &self,
        forest: &mut Forest,
        data: &SerializedNode,
        parent: Option<NodeKey>,
    ) -> Option<NodeKey> {
        let Some(factory) = self.registry.get(&data.kind) else {
            tracing::warn!(
                kind = %data.kind,
                label = %data.label,
                "Unknown node kind, dropping subtree"
            );
            return None;
        };

        let mut node = factory(data.label.clone());
        node.set_id(data.id.as_str());

        for (name, value) in &data.properties {
            if value.is_null() {
                continue;
            }
            match node.set_property(name, value.clone()) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!(kind = %data.kind, field = %name, "Ignoring unknown property");
                }
                Err(e) => {
                    tracing::error!(
                        kind = %data.kind,
                        node_id = %data.id,
                        error = %e,
                        "Failed to restore node, dropping subtree"
                    );
                    return None;
                }
            }
        }

        let key = match forest.insert(parent, node) {
            Ok(key) => key,
            Err(e) => {
                tracing::error!(node_id = %data.id, error = %e, "Failed to attach node");
                return None;
            }
        };

        for (index, entry) in data.children.iter().enumerate() {
            match SerializedNode::from_entry(entry) {
                Ok(child) => {
                    self.deserialize_node(forest, &child, Some(key));
                }
                Err(e) => {
                    tracing::warn!(
                        parent_id = %data.id,
                        index,
                        error = %e,
                        "Skipping malformed child entry"
                    );
                }
            }
        }
        Some(key)
    }

    /// Parses a document into a fresh forest.
    ///
    /// Older documents run through the migration chain first. A version with
    /// no migration path, or a failing step, is logged and the document is
    /// read as-is.
    pub fn deserialize_tree(&self, document: &str) -> Forest {
        let mut forest = Forest::new();

        let raw = match parse_document(document) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Tree document is not valid JSON, starting empty");
                return forest;
            }
        };

        let version = raw
            .get("version")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        let raw = self.upgrade(raw, version);

        let tree: SerializedTree = match serde_json::from_value(raw) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::error!(error = %e, "Tree document has an invalid shape, starting empty");
                return forest;
            }
        };

        let total = tree.nodes.len();
        let mut restored = 0;
        for (index, entry) in tree.nodes.iter().enumerate() {
            match SerializedNode::from_entry(entry) {
                Ok(root) => {
                    if self.deserialize_node(&mut forest, &root, None).is_some() {
                        restored += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed root entry");
                }
            }
        }

        tracing::info!(
            roots = restored,
            dropped = total - restored,
            nodes = forest.len(),
            "Tree restored"
        );
        forest
    }

    fn upgrade(&self, raw: Value, version: u32) -> Value {
        if version == CURRENT_VERSION {
            return raw;
        }

        tracing::warn!(
            found = version,
            expected = CURRENT_VERSION,
            "Tree document version mismatch"
        );

        if !self.migrations.can_migrate(version) {
            tracing::warn!(
                version,
                "No migration path for tree document, reading best-effort"
            );
            return raw;
        }

        match self.migrations.migrate_to_latest(raw.clone(), version) {
            Ok(migrated) => migrated,
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::error!(
                    version,
                    error = %message,
                    "Tree document migration failed, reading unmigrated document"
                );
                raw
            }
        }
    }
}

/// Parses without serde_json's nesting cap; every tree level costs two JSON
/// levels, and written documents can be arbitrarily deep.
fn parse_document(document: &str) -> serde_json::Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(document);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}
