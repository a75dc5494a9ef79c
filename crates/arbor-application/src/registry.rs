//! Process-wide default kind registry.

use arbor_core::KindRegistry;
use arbor_core::kinds::register_builtin_kinds;
use once_cell::sync::Lazy;
use std::sync::Arc;

static DEFAULT_REGISTRY: Lazy<Arc<KindRegistry>> = Lazy::new(|| {
    let mut registry = KindRegistry::new();
    register_builtin_kinds(&mut registry);
    tracing::debug!(kinds = registry.len(), "Built default kind registry");
    Arc::new(registry)
});

/// The registry holding every built-in kind, built once on first use.
///
/// Hosts that add their own kinds build a [`KindRegistry`] themselves and
/// pass it to [`crate::ExplorerService::new`].
pub fn default_registry() -> Arc<KindRegistry> {
    DEFAULT_REGISTRY.clone()
}
