//! Plain-text notes and local file references.

use crate::error::Result;
use crate::node::{KindDescriptor, NODE, Node, NodeKind, decode_field};
use crate::registry::KindRegistry;
use serde_json::Value;
use std::any::Any;

pub static NOTE: KindDescriptor = KindDescriptor {
    tag: "Note",
    parent: Some(&NODE),
    fields: &["Content"],
    transient: &[],
};

pub static FILE: KindDescriptor = KindDescriptor {
    tag: "File",
    parent: Some(&NODE),
    fields: &["FilePath"],
    transient: &[],
};

#[derive(Debug, Clone, Default)]
pub struct Note {
    pub content: String,
}

impl Note {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl NodeKind for Note {
    fn descriptor(&self) -> &'static KindDescriptor {
        &NOTE
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "Content" => Some(Value::String(self.content.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
        match name {
            "Content" => {
                self.content = decode_field(&NOTE, name, value)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.content.clone()]
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

/// A reference to a file on the local machine.
#[derive(Debug, Clone, Default)]
pub struct File {
    pub path: String,
}

impl File {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl NodeKind for File {
    fn descriptor(&self) -> &'static KindDescriptor {
        &FILE
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        match name {
            "FilePath" if !self.path.is_empty() => Some(Value::String(self.path.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
        match name {
            "FilePath" => {
                self.path = decode_field(&FILE, name, value)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn search_text(&self) -> Vec<String> {
        vec![self.path.clone()]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(super) fn register(registry: &mut KindRegistry) {
    registry.register_kind(&NOTE, |label| {
        let mut node = Node::new(label, Note::default());
        super::wire_common_hooks(&mut node);
        node
    });
    registry.register_kind(&FILE, |label| {
        let mut node = Node::new(label, File::default());
        super::wire_common_hooks(&mut node);
        node
    });
}
