//! Explorer use case.
//!
//! `ExplorerService` is the composition point: it owns the shared forest,
//! rebuilds it from the tree store, routes resource nodes to their providers,
//! and writes the forest back when asked. Saving is always explicit.

use crate::registry::default_registry;
use arbor_core::kinds::{ResourceKind, ResourceNode, resource_node};
use arbor_core::remote::{MethodResult, NaturalKey, ResourceDetails, ResourceItem, ResourceProvider};
use arbor_core::visibility::visible_tree;
use arbor_core::{
    ArborError, Forest, KindRegistry, Node, NodeKey, NodeOperation, Result, TreeStore, TreeView,
    ViewFilter,
};
use arbor_infrastructure::{MigrationChain, TreeSerializer};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Use case for browsing and editing the explorer tree.
///
/// # Thread Safety
///
/// The forest sits behind a `tokio::sync::RwLock`. The lock is never held
/// across a backend call: a refresh marks its node busy, releases the lock,
/// awaits the provider, then re-validates the node before applying results.
pub struct ExplorerService {
    /// The whole tree; the single shared mutable structure.
    forest: Arc<RwLock<Forest>>,
    serializer: TreeSerializer,
    store: Arc<dyn TreeStore>,
    providers: HashMap<ResourceKind, Arc<dyn ResourceProvider>>,
}

impl ExplorerService {
    /// Creates a service over `store` using `registry` to rebuild nodes.
    ///
    /// # Arguments
    ///
    /// * `registry` - Kind registry used for every deserialization and `add_*` call
    /// * `store` - Where the tree document is loaded from and saved to
    pub fn new(registry: Arc<KindRegistry>, store: Arc<dyn TreeStore>) -> Self {
        Self {
            forest: Arc::new(RwLock::new(Forest::new())),
            serializer: TreeSerializer::new(registry),
            store,
            providers: HashMap::new(),
        }
    }

    /// Creates a service with the built-in kinds only.
    pub fn with_default_registry(store: Arc<dyn TreeStore>) -> Self {
        Self::new(default_registry(), store)
    }

    /// Registers the provider for its resource kind. A later provider for the
    /// same kind replaces the earlier one.
    pub fn with_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        let kind = provider.kind();
        if self.providers.insert(kind, provider).is_some() {
            tracing::warn!(kind = %kind, "Replacing resource provider");
        }
        self
    }

    /// Uses `migrations` when loading older documents.
    pub fn with_migrations(mut self, migrations: MigrationChain) -> Self {
        self.serializer = self.serializer.clone().with_migrations(migrations);
        self
    }

    pub fn registry(&self) -> &Arc<KindRegistry> {
        self.serializer.registry()
    }

    pub fn provider(&self, kind: ResourceKind) -> Option<Arc<dyn ResourceProvider>> {
        self.providers.get(&kind).cloned()
    }

    // ============================================================================
    // Persistence
    // ============================================================================

    /// Replaces the in-memory forest with the stored document.
    ///
    /// A missing or malformed document yields an empty forest. Every
    /// provider's tracked list is rebuilt from the restored resource nodes,
    /// so resources of the previous forest are forgotten.
    ///
    /// # Returns
    ///
    /// The number of restored nodes.
    pub async fn load(&self) -> Result<usize> {
        let restored = match self.store.load().await? {
            Some(document) => self.serializer.deserialize_tree(&document),
            None => {
                tracing::info!("No saved tree, starting empty");
                Forest::new()
            }
        };

        let resources = resources_in(&restored, &restored.walk());
        let count = restored.len();
        *self.forest.write().await = restored;

        let mut by_kind: HashMap<ResourceKind, Vec<ResourceItem>> = HashMap::new();
        for (kind, item) in resources {
            by_kind.entry(kind).or_default().push(item);
        }
        for (kind, provider) in &self.providers {
            let items = by_kind.remove(kind).unwrap_or_default();
            provider.reset_tracked(items).await;
        }

        tracing::info!(nodes = count, "Explorer tree loaded");
        Ok(count)
    }

    /// Writes the whole forest to the store.
    pub async fn save(&self) -> Result<()> {
        let document = {
            let forest = self.forest.read().await;
            self.serializer.serialize_tree(&forest)?
        };
        self.store.save(&document).await?;
        tracing::debug!(bytes = document.len(), "Explorer tree saved");
        Ok(())
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// Runs `f` against the current forest.
    pub async fn read<R>(&self, f: impl FnOnce(&Forest) -> R) -> R {
        let forest = self.forest.read().await;
        f(&forest)
    }

    pub async fn find(&self, id: &str) -> Option<NodeKey> {
        self.forest.read().await.find_by_id(id)
    }

    /// Like [`find`](Self::find), but a missing id is an error.
    pub async fn resolve(&self, id: &str) -> Result<NodeKey> {
        self.find(id)
            .await
            .ok_or_else(|| ArborError::not_found("Node", id))
    }

    /// The presentation snapshot of everything visible under `filter`.
    pub async fn visible_tree(&self, filter: &ViewFilter) -> Vec<TreeView> {
        let forest = self.forest.read().await;
        visible_tree(&forest, filter)
    }

    // ============================================================================
    // Structural edits
    // ============================================================================

    /// Adds a new top-level node of kind `tag`.
    pub async fn add_root(&self, tag: &str, label: &str) -> Result<NodeKey> {
        let node = self.registry().create(tag, label)?;
        let key = self.forest.write().await.insert_root(node);
        tracing::info!(kind = tag, label, node = %key, "Added root node");
        Ok(key)
    }

    /// Adds a new node of kind `tag` under `parent`.
    ///
    /// # Returns
    ///
    /// - `Ok(NodeKey)`: the new child
    /// - `Err(ArborError::UnknownKind)`: `tag` is not registered
    /// - `Err(ArborError::Tree)`: `parent` does not accept children
    pub async fn add_child(&self, parent: NodeKey, tag: &str, label: &str) -> Result<NodeKey> {
        let node = self.registry().create(tag, label)?;
        let mut forest = self.forest.write().await;
        ensure_accepts_children(&forest, parent)?;
        let key = forest.insert_child(parent, node)?;
        tracing::info!(kind = tag, label, parent = %parent, node = %key, "Added child node");
        Ok(key)
    }

    /// Removes `key` and its subtree, through the node's own remove hook when
    /// it has one. Resources in the subtree are untracked.
    pub async fn remove_node(&self, key: NodeKey) -> Result<()> {
        let resources = {
            let mut forest = self.forest.write().await;
            let mut subtree = vec![key];
            subtree.extend(forest.descendants(key));
            let resources = resources_in(&forest, &subtree);

            if forest.node(key)?.supports(NodeOperation::Remove) {
                forest.fire(key, NodeOperation::Remove)?;
            }
            if forest.contains(key) {
                forest.remove(key)?;
            }
            resources
        };

        for (kind, item) in &resources {
            if let Some(provider) = self.providers.get(kind) {
                provider.remove_item(item).await;
            }
        }
        tracing::info!(node = %key, untracked = resources.len(), "Removed node");
        Ok(())
    }

    /// Re-parents `key` under `new_parent` (`None` makes it a root).
    pub async fn move_node(&self, key: NodeKey, new_parent: Option<NodeKey>) -> Result<()> {
        let mut forest = self.forest.write().await;
        if let Some(parent) = new_parent {
            ensure_accepts_children(&forest, parent)?;
        }
        forest.move_node(key, new_parent)
    }

    // ============================================================================
    // Node state
    // ============================================================================

    pub async fn set_favorite(&self, key: NodeKey, favorite: bool) -> Result<()> {
        self.update_node(key, |node| node.set_favorite(favorite))
            .await
    }

    pub async fn set_hidden(&self, key: NodeKey, hidden: bool) -> Result<()> {
        self.update_node(key, |node| node.set_hidden(hidden)).await
    }

    pub async fn set_profile(&self, key: NodeKey, profile: Option<String>) -> Result<()> {
        self.update_node(key, |node| node.set_profile(profile))
            .await
    }

    pub async fn rename(&self, key: NodeKey, label: &str) -> Result<()> {
        self.update_node(key, |node| node.set_label(label)).await
    }

    /// Assigns one field by name, as the serializer would.
    pub async fn set_property(
        &self,
        key: NodeKey,
        field: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        let mut forest = self.forest.write().await;
        let node = forest.node_mut(key)?;
        if !node.set_property(field, value)? {
            return Err(ArborError::invalid_property(
                node.kind_tag(),
                field,
                "no such field",
            ));
        }
        Ok(())
    }

    async fn update_node(&self, key: NodeKey, f: impl FnOnce(&mut Node)) -> Result<()> {
        let mut forest = self.forest.write().await;
        f(forest.node_mut(key)?);
        Ok(())
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Triggers `operation` on `key`.
    ///
    /// Refresh and remove go through [`refresh`](Self::refresh) and
    /// [`remove_node`](Self::remove_node); everything else runs the node's
    /// hooks. An operation the node has no hooks for is rejected.
    pub async fn fire(&self, key: NodeKey, operation: NodeOperation) -> Result<()> {
        match operation {
            NodeOperation::Refresh => self.refresh(key).await.map(|_| ()),
            NodeOperation::Remove => self.remove_node(key).await,
            _ => {
                let mut forest = self.forest.write().await;
                let node = forest.node(key)?;
                if !node.supports(operation) {
                    return Err(ArborError::tree(format!(
                        "{} '{}' does not support {}",
                        node.kind_tag(),
                        node.label(),
                        operation
                    )));
                }
                forest.fire(key, operation)
            }
        }
    }

    /// Reloads the remote children of a resource node.
    ///
    /// At most one refresh runs per node: a second call while the first is
    /// in flight fails with [`ArborError::Busy`] and leaves the first alone.
    /// Nodes that are not resources run their own refresh hooks, if any.
    ///
    /// # Returns
    ///
    /// The number of children listed.
    pub async fn refresh(&self, key: NodeKey) -> Result<usize> {
        let (node_id, kind, item, provider) = {
            let mut forest = self.forest.write().await;
            let node = forest.node(key)?;
            let Some((kind, item)) = node
                .downcast_ref::<ResourceNode>()
                .map(|resource| (resource.kind, resource.to_item()))
            else {
                if node.supports(NodeOperation::Refresh) {
                    forest.fire(key, NodeOperation::Refresh)?;
                }
                return Ok(forest.children(key).len());
            };

            let provider = self
                .providers
                .get(&kind)
                .cloned()
                .ok_or_else(|| ArborError::not_found("ResourceProvider", kind.to_string()))?;

            let node = forest.node_mut(key)?;
            if !node.start_working() {
                tracing::debug!(node_id = node.id(), "Refresh already in flight");
                return Err(ArborError::busy(node.id(), NodeOperation::Refresh));
            }
            (node.id().to_string(), kind, item, provider)
        };

        tracing::debug!(node_id = %node_id, kind = %kind, "Refreshing resource");
        provider.invalidate(Some(&item)).await;
        let listed = provider.list_children(&item).await;

        let mut forest = self.forest.write().await;
        if !forest.get(key).is_some_and(|node| node.id() == node_id) {
            tracing::debug!(node_id = %node_id, "Node removed during refresh");
            return Err(ArborError::not_found("Node", node_id));
        }

        let outcome = listed.and_then(|items| {
            replace_remote_children(&mut forest, key, kind, &items)?;
            Ok(items.len())
        });
        if let Some(node) = forest.get_mut(key) {
            node.stop_working();
        }

        match &outcome {
            Ok(count) => tracing::info!(node_id = %node_id, children = count, "Resource refreshed"),
            Err(e) => tracing::warn!(node_id = %node_id, error = %e, "Resource refresh failed"),
        }
        outcome
    }

    // ============================================================================
    // Resources
    // ============================================================================

    /// Adds a resource node for `item` under `parent` (or as a root).
    ///
    /// # Returns
    ///
    /// - `Ok(Some(NodeKey))`: the new node
    /// - `Ok(None)`: the resource is already in the tree; nothing changed
    pub async fn track_resource(
        &self,
        kind: ResourceKind,
        item: ResourceItem,
        parent: Option<NodeKey>,
    ) -> Result<Option<NodeKey>> {
        let natural_key = item.natural_key();
        let key = {
            let mut forest = self.forest.write().await;
            let walk = forest.walk();
            let tracked = resources_in(&forest, &walk)
                .into_iter()
                .any(|(k, existing)| k == kind && existing.natural_key() == natural_key);
            if tracked {
                tracing::debug!(kind = %kind, key = %natural_key, "Resource already tracked");
                return Ok(None);
            }
            if let Some(parent) = parent {
                ensure_accepts_children(&forest, parent)?;
            }
            forest.insert(parent, resource_node(kind, &item))?
        };

        if let Some(provider) = self.providers.get(&kind) {
            provider.add_item(item).await;
        }
        tracing::info!(kind = %kind, key = %natural_key, node = %key, "Tracking resource");
        Ok(Some(key))
    }

    /// Lists every resource of `kind` in the configured region.
    pub async fn list_remote(&self, kind: ResourceKind) -> MethodResult<Vec<ResourceItem>> {
        match self.providers.get(&kind) {
            Some(provider) => provider.list_root_items().await.into(),
            None => MethodResult::failure(ArborError::not_found(
                "ResourceProvider",
                kind.to_string(),
            )),
        }
    }

    /// Describes the resource behind `key`.
    pub async fn describe(&self, key: NodeKey) -> MethodResult<ResourceDetails> {
        let resource = {
            let forest = self.forest.read().await;
            forest
                .get(key)
                .and_then(|node| node.downcast_ref::<ResourceNode>())
                .map(|resource| (resource.kind, resource.to_item()))
        };
        let Some((kind, item)) = resource else {
            return MethodResult::failure(format!("{} is not a resource node", key));
        };
        match self.providers.get(&kind) {
            Some(provider) => provider.describe_item(&item).await.into(),
            None => MethodResult::failure(ArborError::not_found(
                "ResourceProvider",
                kind.to_string(),
            )),
        }
    }
}

fn ensure_accepts_children(forest: &Forest, parent: NodeKey) -> Result<()> {
    let node = forest.node(parent)?;
    if node.supports(NodeOperation::AddChild) {
        Ok(())
    } else {
        Err(ArborError::tree(format!(
            "{} '{}' does not accept children",
            node.kind_tag(),
            node.label()
        )))
    }
}

/// Resource records of the given nodes, skipping non-resource nodes.
fn resources_in(forest: &Forest, keys: &[NodeKey]) -> Vec<(ResourceKind, ResourceItem)> {
    keys.iter()
        .filter_map(|key| forest.get(*key)?.downcast_ref::<ResourceNode>())
        .map(|resource| (resource.kind, resource.to_item()))
        .collect()
}

/// Swaps the listed children of a resource node for `items`.
fn replace_remote_children(
    forest: &mut Forest,
    key: NodeKey,
    kind: ResourceKind,
    items: &[ResourceItem],
) -> Result<()> {
    let Some(child_kind) = kind.child_kind() else {
        return Ok(());
    };

    let stale: Vec<NodeKey> = forest
        .children(key)
        .into_iter()
        .filter(|child| {
            forest
                .get(*child)
                .and_then(|node| node.downcast_ref::<ResourceNode>())
                .is_some_and(|resource| resource.kind == child_kind)
        })
        .collect();
    for child in stale {
        forest.remove(child)?;
    }

    for item in items {
        forest.insert_child(key, resource_node(child_kind, item))?;
    }

    if let Some(resource) = forest.node_mut(key)?.downcast_mut::<ResourceNode>() {
        resource.cached_children = items
            .iter()
            .map(|item| item.sub_name.clone().unwrap_or_else(|| item.name.clone()))
            .collect();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::remote::{CachedResourceProvider, ListScope, Page, ResourceBackend};
    use arbor_core::{CallContext, MemoryTreeStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Log backend: one root group, two streams per group. When gated, child
    /// listings wait for `release`.
    struct LogBackend {
        gated: bool,
        entered: Notify,
        release: Notify,
        child_calls: AtomicUsize,
    }

    impl LogBackend {
        fn new(gated: bool) -> Self {
            Self {
                gated,
                entered: Notify::new(),
                release: Notify::new(),
                child_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ResourceBackend for LogBackend {
        async fn list_page(
            &self,
            ctx: &CallContext,
            scope: &ListScope,
            _cursor: Option<String>,
        ) -> Result<Page<ResourceItem>> {
            match scope {
                ListScope::Root => Ok(Page::last(vec![ResourceItem::new(
                    ctx.region.clone(),
                    "/aws/lambda/orders",
                )])),
                ListScope::Children(item) => {
                    self.child_calls.fetch_add(1, Ordering::SeqCst);
                    if self.gated {
                        self.entered.notify_one();
                        self.release.notified().await;
                    }
                    Ok(Page::last(vec![item.nested("stream-a"), item.nested("stream-b")]))
                }
            }
        }

        async fn describe(&self, _ctx: &CallContext, item: &ResourceItem) -> Result<ResourceDetails> {
            Ok(ResourceDetails {
                title: item.name.clone(),
                fields: vec![("Region".to_string(), item.region.clone())],
            })
        }
    }

    fn service(backend: Arc<LogBackend>) -> (ExplorerService, Arc<MemoryTreeStore>) {
        let store = Arc::new(MemoryTreeStore::new());
        let provider = CachedResourceProvider::new(
            ResourceKind::LogGroup,
            backend,
            Arc::new(CallContext::new("us-east-1")),
        );
        let service = ExplorerService::with_default_registry(store.clone())
            .with_provider(Arc::new(provider));
        (service, store)
    }

    fn orders() -> ResourceItem {
        ResourceItem::new("us-east-1", "/aws/lambda/orders")
    }

    #[tokio::test]
    async fn test_add_and_query_nodes() {
        let (service, _) = service(Arc::new(LogBackend::new(false)));
        let root = service.add_root("Folder", "Scripts").await.unwrap();
        let script = service.add_child(root, "BashScript", "Deploy").await.unwrap();

        service.set_favorite(script, true).await.unwrap();
        service.rename(root, "Ops").await.unwrap();

        let views = service.visible_tree(&ViewFilter::default().favorites_only()).await;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].label, "Ops");
        assert_eq!(views[0].children[0].label, "Deploy");
        assert_eq!(views[0].children[0].kind, "BashScript");
    }

    #[tokio::test]
    async fn test_add_child_requires_a_container() {
        let (service, _) = service(Arc::new(LogBackend::new(false)));
        let note = service.add_root("Note", "todo").await.unwrap();

        let err = service.add_child(note, "Folder", "nested").await.unwrap_err();
        assert!(matches!(err, ArborError::Tree(_)));

        let err = service.add_root("Spaceship", "x").await.unwrap_err();
        assert!(matches!(err, ArborError::UnknownKind(_)));
    }

    #[tokio::test]
    async fn test_fire_runs_hooks_and_rejects_unsupported() {
        let (service, _) = service(Arc::new(LogBackend::new(false)));
        let root = service.add_root("Folder", "root").await.unwrap();
        service.fire(root, NodeOperation::AddChild).await.unwrap();
        assert_eq!(service.read(|f| f.children(root).len()).await, 1);

        let err = service.fire(root, NodeOperation::Run).await.unwrap_err();
        assert!(matches!(err, ArborError::Tree(_)));
    }

    #[tokio::test]
    async fn test_track_resource_is_deduplicated() {
        let (service, _) = service(Arc::new(LogBackend::new(false)));

        let first = service
            .track_resource(ResourceKind::LogGroup, orders(), None)
            .await
            .unwrap();
        let second = service
            .track_resource(ResourceKind::LogGroup, orders(), None)
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(service.read(|f| f.len()).await, 1);
        let provider = service.provider(ResourceKind::LogGroup).unwrap();
        assert_eq!(provider.tracked_items().await.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_lists_children_without_persisting_them() {
        let (service, store) = service(Arc::new(LogBackend::new(false)));
        let group = service
            .track_resource(ResourceKind::LogGroup, orders(), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(service.refresh(group).await.unwrap(), 2);
        // A second refresh replaces, not appends.
        assert_eq!(service.refresh(group).await.unwrap(), 2);
        let labels: Vec<String> = service
            .read(|f| {
                f.children(group)
                    .iter()
                    .map(|k| f.node(*k).unwrap().label().to_string())
                    .collect()
            })
            .await;
        assert_eq!(labels, vec!["stream-a", "stream-b"]);

        service.save().await.unwrap();
        let document = store.load().await.unwrap().unwrap();
        assert!(!document.contains("stream-a"));
    }

    #[tokio::test]
    async fn test_second_refresh_is_rejected_while_first_is_in_flight() {
        let backend = Arc::new(LogBackend::new(true));
        let (service, _) = service(backend.clone());
        let service = Arc::new(service);
        let group = service
            .track_resource(ResourceKind::LogGroup, orders(), None)
            .await
            .unwrap()
            .unwrap();

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.refresh(group).await }
        });
        backend.entered.notified().await;

        let err = service.refresh(group).await.unwrap_err();
        assert!(err.is_busy());

        backend.release.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), 2);
        assert_eq!(backend.child_calls.load(Ordering::SeqCst), 1);

        // The flag is cleared once the first refresh lands.
        let working = service.read(|f| f.node(group).unwrap().is_working()).await;
        assert!(!working);
    }

    #[tokio::test]
    async fn test_remove_untracks_resources_in_subtree() {
        let (service, _) = service(Arc::new(LogBackend::new(false)));
        let folder = service.add_root("Folder", "logs").await.unwrap();
        service
            .track_resource(ResourceKind::LogGroup, orders(), Some(folder))
            .await
            .unwrap();

        service.remove_node(folder).await.unwrap();

        assert_eq!(service.read(|f| f.len()).await, 0);
        let provider = service.provider(ResourceKind::LogGroup).unwrap();
        assert!(provider.tracked_items().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_and_describe_report_method_results() {
        let (service, _) = service(Arc::new(LogBackend::new(false)));

        let listed = service.list_remote(ResourceKind::LogGroup).await;
        assert!(listed.is_successful);
        assert_eq!(listed.result.unwrap().len(), 1);

        let missing = service.list_remote(ResourceKind::S3Bucket).await;
        assert!(!missing.is_successful);
        assert!(missing.error.is_some());

        let group = service
            .track_resource(ResourceKind::LogGroup, orders(), None)
            .await
            .unwrap()
            .unwrap();
        let details = service.describe(group).await.into_result().unwrap();
        assert_eq!(details.title, "/aws/lambda/orders");
    }

    #[tokio::test]
    async fn test_save_and_load_restore_tracking() {
        let backend = Arc::new(LogBackend::new(false));
        let (service, store) = service(backend.clone());
        service
            .track_resource(ResourceKind::LogGroup, orders(), None)
            .await
            .unwrap();
        service.save().await.unwrap();

        let document = store.load().await.unwrap().unwrap();
        let (reloaded, _) = service_with_document(backend, document);
        assert_eq!(reloaded.load().await.unwrap(), 1);
        let provider = reloaded.provider(ResourceKind::LogGroup).unwrap();
        assert_eq!(provider.tracked_items().await, vec![orders()]);
    }

    #[tokio::test]
    async fn test_load_replaces_tracking_of_previous_forest() {
        let backend = Arc::new(LogBackend::new(false));
        let (service, _) = service(backend.clone());
        service
            .track_resource(ResourceKind::LogGroup, orders(), None)
            .await
            .unwrap();

        // Nothing stored yet: the reload empties both tree and tracking.
        assert_eq!(service.load().await.unwrap(), 0);
        let provider = service.provider(ResourceKind::LogGroup).unwrap();
        assert!(provider.tracked_items().await.is_empty());

        // A different document brings its own resources only.
        let worker = ResourceItem::new("us-east-1", "/aws/lambda/worker");
        let (other, other_store) = self::service(backend.clone());
        other
            .track_resource(ResourceKind::LogGroup, worker.clone(), None)
            .await
            .unwrap();
        other.save().await.unwrap();
        let document = other_store.load().await.unwrap().unwrap();

        let (reloaded, _) = service_with_document(backend, document);
        reloaded
            .track_resource(ResourceKind::LogGroup, orders(), None)
            .await
            .unwrap();
        assert_eq!(reloaded.load().await.unwrap(), 1);
        let provider = reloaded.provider(ResourceKind::LogGroup).unwrap();
        assert_eq!(provider.tracked_items().await, vec![worker.clone()]);

        // Loading twice is idempotent.
        reloaded.load().await.unwrap();
        assert_eq!(provider.tracked_items().await, vec![worker]);
    }

    fn service_with_document(
        backend: Arc<LogBackend>,
        document: String,
    ) -> (ExplorerService, Arc<MemoryTreeStore>) {
        let store = Arc::new(MemoryTreeStore::with_document(document));
        let provider = CachedResourceProvider::new(
            ResourceKind::LogGroup,
            backend,
            Arc::new(CallContext::new("us-east-1")),
        );
        let service = ExplorerService::with_default_registry(store.clone())
            .with_provider(Arc::new(provider));
        (service, store)
    }
}
