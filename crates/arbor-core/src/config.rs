//! Explorer configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; the core only needs
//! the shape and the call context it yields.

use crate::context::{CallContext, ConfigProvider};
use crate::visibility::ViewFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Tree document location. `None` uses the platform default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_file: Option<PathBuf>,
    #[serde(default = "default_region")]
    pub default_region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub view: ViewSettings,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            tree_file: None,
            default_region: default_region(),
            profile: None,
            endpoint: None,
            log_level: default_log_level(),
            view: ViewSettings::default(),
        }
    }
}

/// Persisted view toggles, the starting point of every filter.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewSettings {
    #[serde(default)]
    pub show_only_favorites: bool,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl ExplorerConfig {
    /// The filter a fresh view starts with: the saved toggles scoped to the
    /// configured profile.
    pub fn initial_filter(&self) -> ViewFilter {
        ViewFilter {
            text: self.view.filter.clone(),
            show_only_favorites: self.view.show_only_favorites,
            show_hidden: self.view.show_hidden,
            profile: self.profile.clone(),
        }
    }
}

impl ConfigProvider for ExplorerConfig {
    fn call_context(&self) -> CallContext {
        CallContext {
            region: self.default_region.clone(),
            endpoint: self.endpoint.clone(),
            profile: self.profile.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ExplorerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.default_region, "us-east-1");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_view_table_and_call_context() {
        let config: ExplorerConfig = toml::from_str(
            r#"
            default_region = "eu-central-1"
            profile = "prod"
            endpoint = "http://localhost:4566"

            [view]
            show_only_favorites = true
            filter = "orders"
            "#,
        )
        .unwrap();

        let ctx = config.call_context();
        assert_eq!(ctx.region, "eu-central-1");
        assert_eq!(ctx.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(ctx.profile.as_deref(), Some("prod"));

        let filter = config.initial_filter();
        assert!(filter.show_only_favorites);
        assert!(!filter.show_hidden);
        assert_eq!(filter.text.as_deref(), Some("orders"));
        assert_eq!(filter.profile.as_deref(), Some("prod"));
    }
}
