//! Cursor-paginated fetching.

use crate::error::{ArborError, Result};
use std::collections::HashSet;
use std::future::Future;

/// One page of a remote list response.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Continuation token ("Marker", "NextToken"); `None` on the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    pub fn with_cursor(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(cursor.into()),
        }
    }

    pub fn empty() -> Self {
        Self::last(Vec::new())
    }
}

/// Items with a natural identity (region + name, plus sub-resource name for
/// nested resources).
pub trait NaturalKey {
    fn natural_key(&self) -> String;

    /// Key of the resource this one lives under, if any.
    fn parent_key(&self) -> Option<String> {
        None
    }
}

/// Issues `fetch_page` until the backend stops returning a cursor.
///
/// The first call receives `None`; each following call receives the previous
/// page's cursor. An empty first page yields an empty list. If any page
/// fails, the pages fetched so far are discarded and the error is returned.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen_cursors: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = fetch_page(cursor.clone()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_cursor.filter(|c| !c.is_empty()) {
            Some(next) => {
                if !seen_cursors.insert(next.clone()) {
                    return Err(ArborError::remote(format!(
                        "pagination cursor '{}' repeated after {} pages",
                        next, pages
                    )));
                }
                cursor = Some(next);
            }
            None => break,
        }
    }

    tracing::debug!(pages, items = items.len(), "Fetched paginated list");
    Ok(items)
}

/// Keeps the first occurrence of each natural key, preserving order.
pub fn dedup_by_key<T: NaturalKey>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.natural_key()))
        .collect()
}

/// [`fetch_all`] followed by [`dedup_by_key`].
pub async fn fetch_all_unique<T, F, Fut>(fetch_page: F) -> Result<Vec<T>>
where
    T: NaturalKey,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    Ok(dedup_by_key(fetch_all(fetch_page).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str);

    impl NaturalKey for Item {
        fn natural_key(&self) -> String {
            self.0.to_string()
        }
    }

    fn pages() -> Vec<Page<Item>> {
        vec![
            Page::with_cursor(vec![Item("a"), Item("b")], "p2"),
            Page::with_cursor(vec![Item("b"), Item("c")], "p3"),
            Page::last(vec![Item("d")]),
        ]
    }

    #[tokio::test]
    async fn test_fetch_all_follows_cursors_until_exhausted() {
        let pages = pages();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen_cursors = Arc::new(std::sync::Mutex::new(Vec::new()));

        let items = fetch_all(|cursor| {
            let index = calls.fetch_add(1, Ordering::SeqCst);
            seen_cursors.lock().unwrap().push(cursor);
            let page = pages[index].clone();
            async move { Ok::<_, ArborError>(page) }
        })
        .await
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(items.len(), 5);
        assert_eq!(
            *seen_cursors.lock().unwrap(),
            vec![None, Some("p2".to_string()), Some("p3".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_unique_drops_duplicates_across_pages() {
        let pages = pages();
        let calls = AtomicUsize::new(0);
        let items = fetch_all_unique(|_| {
            let page = pages[calls.fetch_add(1, Ordering::SeqCst)].clone();
            async move { Ok::<_, ArborError>(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![Item("a"), Item("b"), Item("c"), Item("d")]);
    }

    #[tokio::test]
    async fn test_empty_first_page() {
        let items: Vec<Item> = fetch_all(|_| async { Ok::<_, ArborError>(Page::empty()) })
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_failure_mid_sequence_discards_everything() {
        let calls = AtomicUsize::new(0);
        let result: Result<Vec<Item>> = fetch_all(|_| {
            let index = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if index == 0 {
                    Ok(Page::with_cursor(vec![Item("a")], "next"))
                } else {
                    Err(ArborError::remote("throttled"))
                }
            }
        })
        .await;

        assert!(result.unwrap_err().is_remote());
    }

    #[tokio::test]
    async fn test_repeated_cursor_is_an_error() {
        let result: Result<Vec<Item>> = fetch_all(|_| async {
            Ok::<_, ArborError>(Page::with_cursor(vec![Item("a")], "same"))
        })
        .await;
        assert!(result.is_err());
    }
}
