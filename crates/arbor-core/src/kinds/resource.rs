//! Cloud resource kinds.
//!
//! All resource kinds share one runtime type, [`ResourceNode`], and differ in
//! their descriptor: which field holds the resource name and, for nested
//! resources such as log streams, which field holds the sub-resource name.

use crate::error::Result;
use crate::node::{KindDescriptor, NODE, Node, NodeKind, decode_field};
use crate::registry::KindRegistry;
use crate::remote::ResourceItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use strum::{Display, EnumIter, IntoEnumIterator};

const FIELD_REGION: &str = "Region";

pub static CLOUD_RESOURCE: KindDescriptor = KindDescriptor {
    tag: "CloudResource",
    parent: Some(&NODE),
    fields: &[FIELD_REGION],
    transient: &[],
};

pub static S3_BUCKET: KindDescriptor = KindDescriptor {
    tag: "S3Bucket",
    parent: Some(&CLOUD_RESOURCE),
    fields: &["BucketName"],
    transient: &[],
};

pub static LOG_GROUP: KindDescriptor = KindDescriptor {
    tag: "LogGroup",
    parent: Some(&CLOUD_RESOURCE),
    fields: &["LogGroupName"],
    transient: &["LogStreams"],
};

pub static LOG_STREAM: KindDescriptor = KindDescriptor {
    tag: "LogStream",
    parent: Some(&CLOUD_RESOURCE),
    fields: &["LogGroupName", "LogStreamName"],
    transient: &[],
};

pub static LAMBDA_FUNCTION: KindDescriptor = KindDescriptor {
    tag: "LambdaFunction",
    parent: Some(&CLOUD_RESOURCE),
    fields: &["FunctionName"],
    transient: &[],
};

pub static IAM_ROLE: KindDescriptor = KindDescriptor {
    tag: "IamRole",
    parent: Some(&CLOUD_RESOURCE),
    fields: &["RoleName"],
    transient: &[],
};

pub static SNS_TOPIC: KindDescriptor = KindDescriptor {
    tag: "SnsTopic",
    parent: Some(&CLOUD_RESOURCE),
    fields: &["TopicArn"],
    transient: &[],
};

pub static STATE_MACHINE: KindDescriptor = KindDescriptor {
    tag: "StateMachine",
    parent: Some(&CLOUD_RESOURCE),
    fields: &["StateMachineArn"],
    transient: &[],
};

pub static GLUE_JOB: KindDescriptor = KindDescriptor {
    tag: "GlueJob",
    parent: Some(&CLOUD_RESOURCE),
    fields: &["JobName"],
    transient: &[],
};

/// The resource kinds the explorer can track.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ResourceKind {
    S3Bucket,
    LogGroup,
    LogStream,
    LambdaFunction,
    IamRole,
    SnsTopic,
    StateMachine,
    GlueJob,
}

impl ResourceKind {
    pub fn descriptor(&self) -> &'static KindDescriptor {
        match self {
            Self::S3Bucket => &S3_BUCKET,
            Self::LogGroup => &LOG_GROUP,
            Self::LogStream => &LOG_STREAM,
            Self::LambdaFunction => &LAMBDA_FUNCTION,
            Self::IamRole => &IAM_ROLE,
            Self::SnsTopic => &SNS_TOPIC,
            Self::StateMachine => &STATE_MACHINE,
            Self::GlueJob => &GLUE_JOB,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.descriptor().tag
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.tag() == tag)
    }

    /// Field holding the resource's own name.
    pub fn name_field(&self) -> &'static str {
        match self {
            Self::S3Bucket => "BucketName",
            Self::LogGroup | Self::LogStream => "LogGroupName",
            Self::LambdaFunction => "FunctionName",
            Self::IamRole => "RoleName",
            Self::SnsTopic => "TopicArn",
            Self::StateMachine => "StateMachineArn",
            Self::GlueJob => "JobName",
        }
    }

    /// Field holding the nested resource name, for kinds that live under
    /// another resource.
    pub fn sub_field(&self) -> Option<&'static str> {
        match self {
            Self::LogStream => Some("LogStreamName"),
            _ => None,
        }
    }

    /// Kind of the remote children listed under this kind.
    pub fn child_kind(&self) -> Option<ResourceKind> {
        match self {
            Self::LogGroup => Some(Self::LogStream),
            _ => None,
        }
    }
}

/// Runtime state of a cloud resource node.
#[derive(Debug, Clone)]
pub struct ResourceNode {
    pub kind: ResourceKind,
    pub region: String,
    pub name: String,
    pub sub_name: Option<String>,
    /// Names of the last listed children. Runtime-only.
    pub cached_children: Vec<String>,
}

impl ResourceNode {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            region: String::new(),
            name: String::new(),
            sub_name: None,
            cached_children: Vec::new(),
        }
    }

    pub fn from_item(kind: ResourceKind, item: &ResourceItem) -> Self {
        Self {
            kind,
            region: item.region.clone(),
            name: item.name.clone(),
            sub_name: item.sub_name.clone(),
            cached_children: Vec::new(),
        }
    }

    /// The kind-agnostic item record a provider understands.
    pub fn to_item(&self) -> ResourceItem {
        ResourceItem {
            region: self.region.clone(),
            name: self.name.clone(),
            sub_name: self.sub_name.clone(),
            attributes: Default::default(),
        }
    }

    /// Label shown for the resource: the innermost name.
    pub fn display_name(&self) -> &str {
        self.sub_name.as_deref().unwrap_or(&self.name)
    }
}

impl NodeKind for ResourceNode {
    fn descriptor(&self) -> &'static KindDescriptor {
        self.kind.descriptor()
    }

    fn get_field(&self, name: &str) -> Option<Value> {
        if name == FIELD_REGION {
            return (!self.region.is_empty()).then(|| Value::String(self.region.clone()));
        }
        if name == self.kind.name_field() {
            return (!self.name.is_empty()).then(|| Value::String(self.name.clone()));
        }
        if Some(name) == self.kind.sub_field() {
            return self.sub_name.clone().map(Value::String);
        }
        if name == "LogStreams" && self.kind == ResourceKind::LogGroup {
            return Some(Value::from(self.cached_children.clone()));
        }
        None
    }

    fn set_field(&mut self, name: &str, value: Value) -> Result<bool> {
        let descriptor = self.kind.descriptor();
        if name == FIELD_REGION {
            self.region = decode_field(descriptor, name, value)?;
            return Ok(true);
        }
        if name == self.kind.name_field() {
            self.name = decode_field(descriptor, name, value)?;
            return Ok(true);
        }
        if Some(name) == self.kind.sub_field() {
            self.sub_name = decode_field(descriptor, name, value)?;
            return Ok(true);
        }
        if name == "LogStreams" && self.kind == ResourceKind::LogGroup {
            self.cached_children = decode_field(descriptor, name, value)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn search_text(&self) -> Vec<String> {
        let mut text = vec![self.region.clone(), self.name.clone()];
        if let Some(sub) = &self.sub_name {
            text.push(sub.clone());
        }
        text
    }

    /// Log streams are listed fresh from the backend on every expansion.
    fn should_persist(&self) -> bool {
        self.kind != ResourceKind::LogStream
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn new_resource(kind: ResourceKind, label: String) -> Node {
    let mut node = Node::new(label, ResourceNode::new(kind));
    super::wire_common_hooks(&mut node);
    node
}

/// Wraps a provider item as a node of the given kind.
pub fn resource_node(kind: ResourceKind, item: &ResourceItem) -> Node {
    let resource = ResourceNode::from_item(kind, item);
    let label = resource.display_name().to_string();
    let mut node = new_resource(kind, label);
    if let Some(slot) = node.downcast_mut::<ResourceNode>() {
        *slot = resource;
    }
    node
}

pub(super) fn register(registry: &mut KindRegistry) {
    for kind in ResourceKind::iter() {
        registry.register_kind(kind.descriptor(), move |label| new_resource(kind, label));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::serializable_fields;
    use serde_json::json;

    fn item(name: &str, sub: Option<&str>) -> ResourceItem {
        ResourceItem {
            region: "eu-west-1".to_string(),
            name: name.to_string(),
            sub_name: sub.map(str::to_string),
            attributes: Default::default(),
        }
    }

    #[test]
    fn test_tags_round_trip() {
        for kind in ResourceKind::iter() {
            assert_eq!(ResourceKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ResourceKind::from_tag("Folder"), None);
    }

    #[test]
    fn test_log_group_cache_is_never_serializable() {
        let fields = serializable_fields(&LOG_GROUP);
        assert!(fields.contains(&"LogGroupName"));
        assert!(fields.contains(&"Region"));
        assert!(!fields.contains(&"LogStreams"));
    }

    #[test]
    fn test_resource_node_from_item() {
        let node = resource_node(ResourceKind::LogStream, &item("/aws/lambda/api", Some("2024/01/01")));
        assert_eq!(node.kind_tag(), "LogStream");
        assert_eq!(node.label(), "2024/01/01");
        assert_eq!(node.get_property("LogGroupName"), Some(json!("/aws/lambda/api")));
        assert_eq!(node.get_property("LogStreamName"), Some(json!("2024/01/01")));
        assert_eq!(node.get_property("Region"), Some(json!("eu-west-1")));
        assert!(!node.kind().should_persist());
    }

    #[test]
    fn test_set_fields_by_kind_specific_name() {
        let mut resource = ResourceNode::new(ResourceKind::LambdaFunction);
        assert!(resource.set_field("FunctionName", json!("api")).unwrap());
        assert!(!resource.set_field("BucketName", json!("nope")).unwrap());
        assert_eq!(resource.to_item().name, "api");
    }
}
