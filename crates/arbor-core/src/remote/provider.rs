//! Resource providers.
//!
//! A backend ([`ResourceBackend`]) owns every protocol detail of one resource
//! type and hands back kind-agnostic [`ResourceItem`] records page by page.
//! [`CachedResourceProvider`] layers pagination, caching and the tracked list
//! on top of any backend, so each resource type only supplies its backend.

use super::cache::{CacheKey, RemoteListCache};
use super::page::{NaturalKey, Page, dedup_by_key};
use super::tracked::TrackedResources;
use crate::context::{CallContext, ConfigProvider};
use crate::error::Result;
use crate::kinds::ResourceKind;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A remote resource as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub region: String,
    pub name: String,
    /// Nested resource name (e.g. a log stream inside a log group).
    #[serde(default)]
    pub sub_name: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ResourceItem {
    pub fn new(region: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            name: name.into(),
            sub_name: None,
            attributes: BTreeMap::new(),
        }
    }

    /// A nested resource living under this one.
    pub fn nested(&self, sub_name: impl Into<String>) -> Self {
        Self {
            region: self.region.clone(),
            name: self.name.clone(),
            sub_name: Some(sub_name.into()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl NaturalKey for ResourceItem {
    fn natural_key(&self) -> String {
        match &self.sub_name {
            Some(sub) => format!("{}|{}|{}", self.region, self.name, sub),
            None => format!("{}|{}", self.region, self.name),
        }
    }

    fn parent_key(&self) -> Option<String> {
        self.sub_name
            .as_ref()
            .map(|_| format!("{}|{}", self.region, self.name))
    }
}

/// Renderable metadata for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceDetails {
    pub title: String,
    pub fields: Vec<(String, String)>,
}

/// What a list call enumerates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Top-level resources in the context's region.
    Root,
    /// Nested resources of one item.
    Children(ResourceItem),
}

/// Protocol adapter for one resource type.
#[async_trait]
pub trait ResourceBackend: Send + Sync {
    /// Fetches one page of `scope`, continuing from `cursor`.
    async fn list_page(
        &self,
        ctx: &CallContext,
        scope: &ListScope,
        cursor: Option<String>,
    ) -> Result<Page<ResourceItem>>;

    async fn describe(&self, ctx: &CallContext, item: &ResourceItem) -> Result<ResourceDetails>;
}

/// Everything the explorer needs from one resource type.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Every resource of this type in the current region.
    async fn list_root_items(&self) -> Result<Vec<ResourceItem>>;

    /// Nested resources of `item`; empty for kinds without children.
    async fn list_children(&self, item: &ResourceItem) -> Result<Vec<ResourceItem>>;

    async fn describe_item(&self, item: &ResourceItem) -> Result<ResourceDetails>;

    /// Starts tracking `item`. Returns false if it was already tracked.
    async fn add_item(&self, item: ResourceItem) -> bool;

    /// Stops tracking `item` and drops its cached lists, children included.
    async fn remove_item(&self, item: &ResourceItem) -> Vec<ResourceItem>;

    async fn tracked_items(&self) -> Vec<ResourceItem>;

    /// Replaces the whole tracked list with `items`, duplicates collapsed.
    async fn reset_tracked(&self, items: Vec<ResourceItem>);

    /// Forgets cached lists so the next listing hits the backend. `None`
    /// drops the region's whole cache.
    async fn invalidate(&self, item: Option<&ResourceItem>);
}

/// Generic provider: pagination + cache + tracked list over a backend.
pub struct CachedResourceProvider<B> {
    kind: ResourceKind,
    backend: Arc<B>,
    config: Arc<dyn ConfigProvider>,
    cache: RemoteListCache<ResourceItem>,
    tracked: RwLock<TrackedResources<ResourceItem>>,
}

impl<B: ResourceBackend> CachedResourceProvider<B> {
    pub fn new(kind: ResourceKind, backend: Arc<B>, config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            kind,
            backend,
            config,
            cache: RemoteListCache::new(),
            tracked: RwLock::new(TrackedResources::new()),
        }
    }

    async fn list_scope(
        &self,
        ctx: &CallContext,
        key: &CacheKey,
        scope: ListScope,
    ) -> Result<Vec<ResourceItem>> {
        let backend = &self.backend;
        let scope = &scope;
        let items = self
            .cache
            .get_or_fetch(key, move |cursor| backend.list_page(ctx, scope, cursor))
            .await?;
        Ok(dedup_by_key(items))
    }
}

#[async_trait]
impl<B: ResourceBackend> ResourceProvider for CachedResourceProvider<B> {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn list_root_items(&self) -> Result<Vec<ResourceItem>> {
        let ctx = self.config.call_context();
        let key = CacheKey::root(ctx.region.clone());
        self.list_scope(&ctx, &key, ListScope::Root).await
    }

    async fn list_children(&self, item: &ResourceItem) -> Result<Vec<ResourceItem>> {
        if self.kind.child_kind().is_none() {
            return Ok(Vec::new());
        }
        let ctx = self.config.call_context().for_region(&item.region);
        let key = CacheKey::scoped(ctx.region.clone(), item.name.clone());
        self.list_scope(&ctx, &key, ListScope::Children(item.clone())).await
    }

    async fn describe_item(&self, item: &ResourceItem) -> Result<ResourceDetails> {
        let ctx = self.config.call_context().for_region(&item.region);
        self.backend.describe(&ctx, item).await
    }

    async fn add_item(&self, item: ResourceItem) -> bool {
        let mut tracked = self.tracked.write().await;
        let added = tracked.add(item);
        if added {
            tracing::info!(kind = %self.kind, tracked = tracked.len(), "Tracking resource");
        }
        added
    }

    async fn remove_item(&self, item: &ResourceItem) -> Vec<ResourceItem> {
        let removed = {
            let mut tracked = self.tracked.write().await;
            tracked.remove(&item.natural_key())
        };
        self.cache
            .invalidate(&CacheKey::scoped(item.region.clone(), item.name.clone()))
            .await;
        tracing::info!(kind = %self.kind, removed = removed.len(), "Untracked resource");
        removed
    }

    async fn tracked_items(&self) -> Vec<ResourceItem> {
        self.tracked.read().await.items().to_vec()
    }

    async fn reset_tracked(&self, items: Vec<ResourceItem>) {
        let mut tracked = self.tracked.write().await;
        tracked.clear();
        for item in items {
            tracked.add(item);
        }
        tracing::debug!(kind = %self.kind, tracked = tracked.len(), "Reset tracked resources");
    }

    async fn invalidate(&self, item: Option<&ResourceItem>) {
        let key = match item {
            Some(item) => CacheKey::scoped(item.region.clone(), item.name.clone()),
            None => CacheKey::root(self.config.call_context().region),
        };
        self.cache.invalidate(&key).await;
    }
}
