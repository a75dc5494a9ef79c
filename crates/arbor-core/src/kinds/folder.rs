use crate::node::{KindDescriptor, NODE, Node, NodeKind, NodeOperation};
use crate::registry::KindRegistry;
use std::any::Any;

pub static FOLDER: KindDescriptor = KindDescriptor {
    tag: "Folder",
    parent: Some(&NODE),
    fields: &[],
    transient: &[],
};

/// A grouping node with no state of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct Folder;

impl NodeKind for Folder {
    fn descriptor(&self) -> &'static KindDescriptor {
        &FOLDER
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub const NEW_FOLDER_LABEL: &str = "New Folder";

/// A folder node with its hooks wired.
pub fn folder(label: impl Into<String>) -> Node {
    let mut node = Node::new(label, Folder);
    super::wire_common_hooks(&mut node);
    node.subscribe(NodeOperation::AddChild, |forest, key| {
        let child = forest.insert_child(key, folder(NEW_FOLDER_LABEL))?;
        tracing::debug!(parent = %key, child = %child, "Added folder");
        Ok(())
    });
    node
}

pub(super) fn register(registry: &mut KindRegistry) {
    registry.register_kind(&FOLDER, |label| folder(label));
}
