//! Script kinds.
//!
//! `Script` is abstract: it declares the fields every script shares but has
//! no factory. Concrete scripts embed a [`ScriptBody`] and inherit its fields
//! through the descriptor chain.

use crate::error::{ArborError, Result};
use crate::node::{KindDescriptor, NODE, Node, NodeKind, NodeOperation, decode_field};
use crate::registry::KindRegistry;
use serde_json::Value;
use std::any::Any;

pub static SCRIPT: KindDescriptor = KindDescriptor {
    tag: "Script",
    parent: Some(&NODE),
    fields: &["Script", "WorkingDirectory"],
    transient: &[],
};

pub static BASH_SCRIPT: KindDescriptor = KindDescriptor {
    tag: "BashScript",
    parent: Some(&SCRIPT),
    fields: &["Shell"],
    transient: &[],
};

/// State shared by every script kind.
#[derive(Debug, Clone, Default)]
pub struct ScriptBody {
    pub script: String,
    pub working_directory: Option<String>,
}

impl ScriptBody {
    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "Script" => Some(Value::String(self.script.clone())),
            "WorkingDirectory" => self.working_directory.clone().map(Value::String),
            _ => None,
        }
    }

    fn set_field(&mut self, descriptor: &KindDescriptor, name: &str, value: Value) -> Result<bool> {
        match name {
            "Script" => {
                self.script = decode_field(descriptor, name, value)?;
                Ok(true)
            }
            "WorkingDirectory" => {
                self.working_directory = decode_field(descriptor, name, value)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BashScript {
    pub body: ScriptBody,
    pub shell: String,
}

impl Default for BashScript {
    fn default() -> Self {
        Self {
            body: ScriptBody::default(),
            shell: "bash".to_string(),
        }
    }
}

impl BashScript {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            body: ScriptBody {
                script: script.into(),
                working_directory: None,
            },
            ..Self::default()
        }
    }

    /// The command line a runner would execute.
    pub fn command_line(&self) -> Vec<String> {
        vec![self.shell.clone(), "-c".to_string(), self.body.script.clone()]
    }
}

impl NodeKind for BashScript {
    fn descriptor(&self) -> &'static KindDescriptor {
        &BASH_SCRIPT
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "Shell" => Some(Value::String(self.shell.clone())),
            _ => self.body.get_field(name),
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
        match name {
            "Shell" => {
                self.shell = decode_field(&BASH_SCRIPT, name, value)?;
                Ok(true)
            }
            _ => self.body.set_field(&BASH_SCRIPT, name, value),
        }
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.body.script.clone()]
    }

    fn case_sensitive_search(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Run marks the script busy until Stop; process spawning belongs to the host.
fn wire_script_hooks(node: &mut Node) {
    node.subscribe(NodeOperation::Run, |forest, key| {
        let node = forest.node_mut(key)?;
        if !node.start_working() {
            return Err(ArborError::busy(node.id(), NodeOperation::Run));
        }
        tracing::info!(node_id = node.id(), label = node.label(), "Script started");
        Ok(())
    });
    node.subscribe(NodeOperation::Stop, |forest, key| {
        let node = forest.node_mut(key)?;
        node.stop_working();
        tracing::info!(node_id = node.id(), label = node.label(), "Script stopped");
        Ok(())
    });
}

pub(super) fn register(registry: &mut KindRegistry) {
    registry.register_kind(&BASH_SCRIPT, |label| {
        let mut node = Node::new(label, BashScript::default());
        super::wire_common_hooks(&mut node);
        wire_script_hooks(&mut node);
        node
    });
}
