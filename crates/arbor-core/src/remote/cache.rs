use super::page::{Page, fetch_all};
use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Composite key of a cached remote list.
///
/// `scope` is a path: an empty scope is a region's root listing, `["group"]`
/// lists the children of `group`, and so on. Invalidating a scope also drops
/// every entry nested below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub region: String,
    pub scope: Vec<String>,
}

impl CacheKey {
    pub fn root(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            scope: Vec::new(),
        }
    }

    pub fn scoped(region: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            scope: vec![scope.into()],
        }
    }

    pub fn child(&self, scope: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.scope.push(scope.into());
        child
    }

    /// Returns true if `self` is `other` or nested below it.
    pub fn is_within(&self, other: &CacheKey) -> bool {
        self.region == other.region && self.scope.starts_with(&other.scope)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.region)?;
        for part in &self.scope {
            write!(f, "/{}", part)?;
        }
        Ok(())
    }
}

/// The most recently fetched list for one key.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub items: Vec<T>,
    /// False when only a leading page was stored.
    pub complete: bool,
}

/// In-memory cache of remote lists.
///
/// Entries are created on first fetch and only dropped by an explicit
/// [`RemoteListCache::invalidate`] or [`RemoteListCache::clear`]; there is no
/// time-based expiry.
pub struct RemoteListCache<T> {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry<T>>>>,
}

impl<T: Clone + Send + Sync> RemoteListCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the cached entry for `key`, complete or not.
    pub async fn get(&self, key: &CacheKey) -> Option<CacheEntry<T>> {
        let entries = self.entries.read().await;
        entries.get(key).cloned()
    }

    /// Returns the complete list for `key`, fetching every page when the key
    /// is missing or only partially cached.
    ///
    /// A failed fetch leaves the cache untouched.
    pub async fn get_or_fetch<F, Fut>(&self, key: &CacheKey, fetch_page: F) -> Result<Vec<T>>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
    {
        if let Some(entry) = self.get(key).await {
            if entry.complete {
                tracing::debug!(key = %key, items = entry.items.len(), "Remote list cache hit");
                return Ok(entry.items);
            }
        }

        tracing::debug!(key = %key, "Remote list cache miss, fetching");
        let items = fetch_all(fetch_page).await?;

        let mut entries = self.entries.write().await;
        entries.insert(
            key.clone(),
            CacheEntry {
                items: items.clone(),
                complete: true,
            },
        );
        Ok(items)
    }

    /// Stores a single leading page so a view can expand before the full
    /// list arrives. Never replaces a complete entry.
    pub async fn put_partial(&self, key: &CacheKey, items: Vec<T>) {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.complete => {}
            _ => {
                entries.insert(
                    key.clone(),
                    CacheEntry {
                        items,
                        complete: false,
                    },
                );
            }
        }
    }

    /// Drops `key` and every entry nested below it. Returns how many entries
    /// were removed.
    pub async fn invalidate(&self, key: &CacheKey) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|existing, _| !existing.is_within(key));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(key = %key, removed, "Invalidated remote list cache");
        }
        removed
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<T: Clone + Send + Sync> Default for RemoteListCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArborError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_second_lookup_does_not_refetch() {
        let cache: RemoteListCache<String> = RemoteListCache::new();
        let key = CacheKey::root("us-east-1");
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let items = cache
                .get_or_fetch(&key, |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, ArborError>(Page::last(vec!["a".to_string()])) }
                })
                .await
                .unwrap();
            assert_eq!(items, vec!["a".to_string()]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: RemoteListCache<String> = RemoteListCache::new();
        let key = CacheKey::root("us-east-1");

        let result = cache
            .get_or_fetch(&key, |_| async {
                Err::<Page<String>, _>(ArborError::remote("denied"))
            })
            .await;
        assert!(result.is_err());
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_partial_entry_is_completed_on_fetch() {
        let cache: RemoteListCache<String> = RemoteListCache::new();
        let key = CacheKey::root("us-east-1");
        cache.put_partial(&key, vec!["a".to_string()]).await;
        assert!(!cache.get(&key).await.unwrap().complete);

        let items = cache
            .get_or_fetch(&key, |_| async {
                Ok::<_, ArborError>(Page::last(vec!["a".to_string(), "b".to_string()]))
            })
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
        assert!(cache.get(&key).await.unwrap().complete);

        // A complete entry is never downgraded.
        cache.put_partial(&key, Vec::new()).await;
        assert_eq!(cache.get(&key).await.unwrap().items.len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_cascades_to_nested_scopes() {
        let cache: RemoteListCache<String> = RemoteListCache::new();
        let group = CacheKey::scoped("us-east-1", "/aws/lambda/api");
        let streams = group.child("streams");
        let other = CacheKey::scoped("us-east-1", "/aws/lambda/worker");
        let other_region = CacheKey::scoped("eu-west-1", "/aws/lambda/api");

        for key in [&group, &streams, &other, &other_region] {
            cache.put_partial(key, vec!["x".to_string()]).await;
        }

        assert_eq!(cache.invalidate(&group).await, 2);
        assert!(cache.get(&streams).await.is_none());
        assert!(cache.get(&other).await.is_some());
        assert!(cache.get(&other_region).await.is_some());
        assert_eq!(cache.len().await, 2);
    }

    #[test]
    fn test_cache_key_display() {
        let key = CacheKey::scoped("us-east-1", "group").child("stream");
        assert_eq!(key.to_string(), "us-east-1/group/stream");
    }
}
