//! The polymorphic tree node.

use super::descriptor::{FIELD_IS_FAVORITE, FIELD_IS_HIDDEN, FIELD_PROFILE, KindDescriptor};
use super::forest::NodeKey;
use super::hooks::{HookSet, NodeOperation};
use crate::error::{ArborError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use uuid::Uuid;

/// Kind-specific state and behavior carried by a [`Node`].
///
/// Implementations expose their persisted fields by name so the serializer
/// can operate over any kind without knowing its concrete type. Only names
/// listed by the kind's [`KindDescriptor`] chain are ever read for
/// persistence; `set_field` may be handed any key found in a document and
/// returns `Ok(false)` for keys the kind does not have.
pub trait NodeKind: Any + Send + Sync + fmt::Debug {
    /// The static descriptor naming this kind's tag and declared fields.
    fn descriptor(&self) -> &'static KindDescriptor;

    /// Returns the current value of a field, or `None` if the field is unset
    /// or cannot be represented as plain JSON.
    fn get_field(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Assigns a persisted value to a field.
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: the field exists and was assigned
    /// - `Ok(false)`: this kind has no such field
    /// - `Err(_)`: the value could not be decoded into the field
    fn set_field(&mut self, _name: &str, _value: Value) -> Result<bool> {
        Ok(false)
    }

    /// Extra text matched by the free-text filter, besides the label.
    fn search_text(&self) -> Vec<String> {
        Vec::new()
    }

    fn case_sensitive_search(&self) -> bool {
        false
    }

    /// Whether nodes of this kind are written to the persisted tree.
    fn should_persist(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Decodes a persisted JSON value into a typed field.
pub fn decode_field<T: DeserializeOwned>(
    descriptor: &KindDescriptor,
    field: &str,
    value: Value,
) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| ArborError::invalid_property(descriptor.tag, field, e.to_string()))
}

/// A node in the explorer forest.
///
/// Parent and child links are arena handles managed by [`super::Forest`];
/// a detached node has neither.
pub struct Node {
    id: String,
    label: String,
    is_favorite: bool,
    is_hidden: bool,
    profile: Option<String>,
    working: bool,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    kind: Box<dyn NodeKind>,
    hooks: HookSet,
}

impl Node {
    /// Creates a detached node with a fresh identifier.
    pub fn new(label: impl Into<String>, kind: impl NodeKind) -> Self {
        Self::from_boxed(label, Box::new(kind))
    }

    pub fn from_boxed(label: impl Into<String>, kind: Box<dyn NodeKind>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            is_favorite: false,
            is_hidden: false,
            profile: None,
            working: false,
            parent: None,
            children: Vec::new(),
            kind,
            hooks: HookSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Replaces the identifier. Empty identifiers are ignored.
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !id.is_empty() {
            self.id = id;
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// The registry tag of this node's concrete kind.
    pub fn kind_tag(&self) -> &'static str {
        self.kind.descriptor().tag
    }

    pub fn descriptor(&self) -> &'static KindDescriptor {
        self.kind.descriptor()
    }

    pub fn kind(&self) -> &dyn NodeKind {
        self.kind.as_ref()
    }

    pub fn kind_mut(&mut self) -> &mut dyn NodeKind {
        self.kind.as_mut()
    }

    pub fn downcast_ref<T: NodeKind>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: NodeKind>(&mut self) -> Option<&mut T> {
        self.kind.as_any_mut().downcast_mut::<T>()
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub fn set_favorite(&mut self, favorite: bool) {
        self.is_favorite = favorite;
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.is_hidden = hidden;
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn set_profile(&mut self, profile: Option<String>) {
        self.profile = profile.filter(|p| !p.is_empty());
    }

    // ============================================================================
    // Working flag
    // ============================================================================

    /// Marks the node as busy. Returns false if it already was.
    pub fn start_working(&mut self) -> bool {
        if self.working {
            return false;
        }
        self.working = true;
        true
    }

    pub fn stop_working(&mut self) {
        self.working = false;
    }

    pub fn is_working(&self) -> bool {
        self.working
    }

    // ============================================================================
    // Hooks
    // ============================================================================

    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookSet {
        &mut self.hooks
    }

    /// Subscribes a handler to one of this node's lifecycle operations.
    pub fn subscribe<F>(&mut self, operation: NodeOperation, handler: F)
    where
        F: Fn(&mut super::Forest, NodeKey) -> Result<()> + Send + Sync + 'static,
    {
        self.hooks.subscribe(operation, handler);
    }

    pub fn supports(&self, operation: NodeOperation) -> bool {
        self.hooks.has(operation)
    }

    // ============================================================================
    // Property access
    // ============================================================================

    /// Reads a field by name, covering both the shared flags and the kind's
    /// own fields.
    pub fn get_property(&self, name: &str) -> Option<Value> {
        match name {
            FIELD_IS_FAVORITE => Some(Value::Bool(self.is_favorite)),
            FIELD_IS_HIDDEN => Some(Value::Bool(self.is_hidden)),
            FIELD_PROFILE => self.profile.clone().map(Value::String),
            _ => self.kind.get_field(name),
        }
    }

    /// Assigns a field by name. See [`NodeKind::set_field`] for the result.
    pub fn set_property(&mut self, name: &str, value: Value) -> Result<bool> {
        match name {
            FIELD_IS_FAVORITE => {
                self.is_favorite = decode_field(self.descriptor(), name, value)?;
                Ok(true)
            }
            FIELD_IS_HIDDEN => {
                self.is_hidden = decode_field(self.descriptor(), name, value)?;
                Ok(true)
            }
            FIELD_PROFILE => {
                let profile: Option<String> = decode_field(self.descriptor(), name, value)?;
                self.set_profile(profile);
                Ok(true)
            }
            _ => self.kind.set_field(name, value),
        }
    }

    /// Text the free-text filter matches against: the label first, then the
    /// kind's own search fields.
    pub fn search_text(&self) -> Vec<String> {
        let mut text = vec![self.label.clone()];
        text.extend(self.kind.search_text());
        text
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("kind", &self.kind_tag())
            .field("is_favorite", &self.is_favorite)
            .field("is_hidden", &self.is_hidden)
            .field("profile", &self.profile)
            .field("children", &self.children.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::descriptor::NODE;
    use serde_json::json;

    static PLAIN: KindDescriptor = KindDescriptor {
        tag: "Plain",
        parent: Some(&NODE),
        fields: &["Count"],
        transient: &[],
    };

    #[derive(Debug, Default)]
    struct Plain {
        count: u32,
    }

    impl NodeKind for Plain {
        fn descriptor(&self) -> &'static KindDescriptor {
            &PLAIN
        }

        fn get_field(&self, name: &str) -> Option<Value> {
            match name {
                "Count" => Some(json!(self.count)),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
            match name {
                "Count" => {
                    self.count = decode_field(&PLAIN, name, value)?;
                    Ok(true)
                }
                _ => Ok(false),
            }
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_new_node_has_unique_id_and_tag() {
        let a = Node::new("a", Plain::default());
        let b = Node::new("b", Plain::default());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.kind_tag(), "Plain");
    }

    #[test]
    fn test_set_id_ignores_empty() {
        let mut node = Node::new("a", Plain::default());
        let original = node.id().to_string();
        node.set_id("");
        assert_eq!(node.id(), original);
        node.set_id("fixed");
        assert_eq!(node.id(), "fixed");
    }

    #[test]
    fn test_shared_flags_through_property_access() {
        let mut node = Node::new("a", Plain::default());
        assert!(node.set_property(FIELD_IS_FAVORITE, json!(true)).unwrap());
        assert!(node.set_property(FIELD_PROFILE, json!("prod")).unwrap());
        assert!(node.is_favorite());
        assert_eq!(node.profile(), Some("prod"));
        assert_eq!(node.get_property(FIELD_IS_HIDDEN), Some(json!(false)));
    }

    #[test]
    fn test_kind_fields_and_unknown_keys() {
        let mut node = Node::new("a", Plain::default());
        assert!(node.set_property("Count", json!(7)).unwrap());
        assert_eq!(node.get_property("Count"), Some(json!(7)));
        assert!(!node.set_property("Nope", json!(1)).unwrap());
        assert!(node.set_property("Count", json!("seven")).is_err());
        assert_eq!(node.downcast_ref::<Plain>().map(|p| p.count), Some(7));
    }

    #[test]
    fn test_working_flag_rejects_second_start() {
        let mut node = Node::new("a", Plain::default());
        assert!(node.start_working());
        assert!(!node.start_working());
        node.stop_working();
        assert!(node.start_working());
    }
}
