//! Per-call region/endpoint/profile context.

use serde::{Deserialize, Serialize};

/// Side input handed to every backend call. The core never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallContext {
    pub region: String,
    pub endpoint: Option<String>,
    pub profile: Option<String>,
}

impl CallContext {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
            profile: None,
        }
    }

    /// The same context pointed at another region.
    pub fn for_region(&self, region: &str) -> Self {
        if region.is_empty() {
            return self.clone();
        }
        Self {
            region: region.to_string(),
            ..self.clone()
        }
    }
}

/// Supplies the context for backend calls.
pub trait ConfigProvider: Send + Sync {
    fn call_context(&self) -> CallContext;
}

impl ConfigProvider for CallContext {
    fn call_context(&self) -> CallContext {
        self.clone()
    }
}
