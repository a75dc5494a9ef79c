use super::page::NaturalKey;

/// The flat list of resources a user has added for one backend kind.
///
/// Adding an already tracked key is a silent no-op. Removing a key also
/// removes every item whose parent is that key, so no orphans remain.
#[derive(Debug, Clone)]
pub struct TrackedResources<T> {
    items: Vec<T>,
}

impl<T: NaturalKey + Clone> TrackedResources<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Tracks `item`. Returns false if its key was already tracked.
    pub fn add(&mut self, item: T) -> bool {
        let key = item.natural_key();
        if self.contains(&key) {
            tracing::debug!(key = %key, "Resource already tracked, skipping add");
            return false;
        }
        self.items.push(item);
        true
    }

    /// Untracks `key` and its children, returning what was removed.
    pub fn remove(&mut self, key: &str) -> Vec<T> {
        let (removed, kept): (Vec<T>, Vec<T>) = self.items.drain(..).partition(|item| {
            item.natural_key() == key || item.parent_key().as_deref() == Some(key)
        });
        self.items = kept;
        removed
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.natural_key() == key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.natural_key() == key)
    }

    pub fn children_of(&self, key: &str) -> Vec<T> {
        self.items
            .iter()
            .filter(|item| item.parent_key().as_deref() == Some(key))
            .cloned()
            .collect()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: NaturalKey + Clone> Default for TrackedResources<T> {
    fn default() -> Self {
        Self::new()
    }
}
