//! Wire shapes of the persisted tree document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One node as stored on disk.
///
/// ```json
/// { "_type": "Folder", "_id": "…", "_label": "Scripts",
///   "_properties": { "IsFavorite": true }, "_children": [] }
/// ```
///
/// Children stay raw values and are decoded one at a time, so a malformed
/// child costs only its own subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
    #[serde(rename = "_label", default, deserialize_with = "lenient_string")]
    pub label: String,
    #[serde(rename = "_properties", default)]
    pub properties: Map<String, Value>,
    #[serde(rename = "_children", default)]
    pub children: Vec<Value>,
}

impl SerializedNode {
    /// Decodes one entry of a `nodes` or `_children` array.
    pub fn from_entry(entry: &Value) -> serde_json::Result<Self> {
        Self::deserialize(entry)
    }

    /// Converts into a JSON value, moving the children in rather than
    /// re-serializing them.
    pub fn into_value(mut self) -> serde_json::Result<Value> {
        let children = std::mem::take(&mut self.children);
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.insert("_children".to_string(), Value::Array(children));
        }
        Ok(value)
    }
}

/// Accepts any scalar: `null` becomes empty, numbers and booleans their text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// The whole document: a version stamp and the forest roots.
///
/// Roots are kept as raw values so that one malformed root cannot fail the
/// parse of its siblings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedTree {
    #[serde(default)]
    pub version: u32,
    #[serde(rename = "savedAt", default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nodes: Vec<Value>,
}
