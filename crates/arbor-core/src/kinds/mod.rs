//! Built-in node kinds.
//!
//! Each kind module owns its descriptor and exposes a `register` function that
//! binds its tag into a [`KindRegistry`]. [`register_builtin_kinds`] wires all
//! of them; hosts adding their own kinds call their own `register` alongside.

mod folder;
mod note;
mod resource;
mod script;

pub use folder::{FOLDER, Folder, NEW_FOLDER_LABEL, folder};
pub use note::{FILE, File, NOTE, Note};
pub use resource::{
    CLOUD_RESOURCE, GLUE_JOB, IAM_ROLE, LAMBDA_FUNCTION, LOG_GROUP, LOG_STREAM, ResourceKind,
    ResourceNode, S3_BUCKET, SNS_TOPIC, STATE_MACHINE, resource_node,
};
pub use script::{BASH_SCRIPT, BashScript, SCRIPT, ScriptBody};

use crate::node::{Node, NodeOperation};
use crate::registry::KindRegistry;

/// Registers every built-in kind.
pub fn register_builtin_kinds(registry: &mut KindRegistry) {
    folder::register(registry);
    note::register(registry);
    script::register(registry);
    resource::register(registry);
}

/// Hooks every kind supports: structural removal.
pub(crate) fn wire_common_hooks(node: &mut Node) {
    node.subscribe(NodeOperation::Remove, |forest, key| {
        let removed = forest.remove(key)?;
        tracing::debug!(node_id = removed.id(), kind = removed.kind_tag(), "Removed node");
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Forest;

    #[test]
    fn test_builtin_kinds_are_registered() {
        let mut registry = KindRegistry::new();
        register_builtin_kinds(&mut registry);
        for tag in [
            "Folder",
            "Note",
            "File",
            "BashScript",
            "S3Bucket",
            "LogGroup",
            "LogStream",
            "LambdaFunction",
            "IamRole",
            "SnsTopic",
            "StateMachine",
            "GlueJob",
        ] {
            assert!(registry.has(tag), "{tag} should be registered");
        }
        // Abstract kinds have no factory.
        assert!(!registry.has("Script"));
        assert!(!registry.has("CloudResource"));
    }

    #[test]
    fn test_registered_nodes_support_remove() {
        let mut registry = KindRegistry::new();
        register_builtin_kinds(&mut registry);

        let mut forest = Forest::new();
        let root = forest.insert_root(registry.create("Folder", "root").unwrap());
        let child = forest
            .insert_child(root, registry.create("Note", "todo").unwrap())
            .unwrap();

        forest.fire(child, NodeOperation::Remove).unwrap();
        assert!(forest.children(root).is_empty());
        assert_eq!(forest.len(), 1);
    }
}
