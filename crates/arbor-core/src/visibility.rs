//! Visibility and filter pipeline.
//!
//! A pure predicate over the forest: nothing here mutates nodes. Four rules
//! combine with AND:
//!
//! - hidden nodes are dropped unless `show_hidden` is set
//! - with `show_only_favorites`, a node stays if it or any descendant is a
//!   favorite
//! - a node tagged with a profile is dropped when another profile is current
//! - free text must match the node or any descendant
//!
//! Descendant searches skip subtrees the hidden and profile rules exclude, so
//! a folder is never kept alive by a node the view would not show.

use crate::node::{Forest, Node, NodeKey};
use serde::{Deserialize, Serialize};

/// Current filter state of a view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewFilter {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub show_only_favorites: bool,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default)]
    pub profile: Option<String>,
}

impl ViewFilter {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.show_only_favorites = true;
        self
    }

    pub fn showing_hidden(mut self) -> Self {
        self.show_hidden = true;
        self
    }

    pub fn for_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    fn active_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    fn active_profile(&self) -> Option<&str> {
        self.profile.as_deref().filter(|p| !p.is_empty())
    }
}

/// Returns true if `key` should be shown under `filter`.
pub fn is_visible(forest: &Forest, key: NodeKey, filter: &ViewFilter) -> bool {
    let Some(node) = forest.get(key) else {
        return false;
    };

    if !in_scope(node, filter) {
        return false;
    }

    if filter.show_only_favorites && !has_favorite(forest, key, filter) {
        return false;
    }

    match filter.active_text() {
        Some(text) => matches_text(forest, key, text, filter),
        None => true,
    }
}

/// The hidden and profile rules, which look at the node alone.
fn in_scope(node: &Node, filter: &ViewFilter) -> bool {
    if node.is_hidden() && !filter.show_hidden {
        return false;
    }
    match (filter.active_profile(), node.profile()) {
        (Some(current), Some(tag)) => current == tag,
        _ => true,
    }
}

/// True if the node or any in-scope descendant is a favorite.
pub fn has_favorite(forest: &Forest, key: NodeKey, filter: &ViewFilter) -> bool {
    let Some(node) = forest.get(key) else {
        return false;
    };
    node.is_favorite()
        || node.children().iter().any(|child| {
            forest
                .get(*child)
                .is_some_and(|n| in_scope(n, filter))
                && has_favorite(forest, *child, filter)
        })
}

/// True if the node or any in-scope descendant matches `text`, stopping at
/// the first match.
pub fn matches_text(forest: &Forest, key: NodeKey, text: &str, filter: &ViewFilter) -> bool {
    let Some(node) = forest.get(key) else {
        return false;
    };
    node_matches(node, text)
        || node.children().iter().any(|child| {
            forest
                .get(*child)
                .is_some_and(|n| in_scope(n, filter))
                && matches_text(forest, *child, text, filter)
        })
}

/// Matches a single node's own search fields. Case sensitivity is decided by
/// the node's kind.
pub fn node_matches(node: &Node, text: &str) -> bool {
    if node.kind().case_sensitive_search() {
        node.search_text().iter().any(|field| field.contains(text))
    } else {
        let needle = text.to_lowercase();
        node.search_text()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Visible children of `parent`, or visible roots when `parent` is `None`.
pub fn visible_children(
    forest: &Forest,
    parent: Option<NodeKey>,
    filter: &ViewFilter,
) -> Vec<NodeKey> {
    let candidates = match parent {
        Some(parent) => forest.children(parent),
        None => forest.roots().to_vec(),
    };
    candidates
        .into_iter()
        .filter(|key| is_visible(forest, *key, filter))
        .collect()
}

/// A filtered, presentation-ready snapshot of one node and its visible
/// subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeView {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub is_favorite: bool,
    pub is_hidden: bool,
    pub profile: Option<String>,
    pub children: Vec<TreeView>,
}

/// Builds the visible forest under `filter`.
pub fn visible_tree(forest: &Forest, filter: &ViewFilter) -> Vec<TreeView> {
    build_views(forest, None, filter)
}

fn build_views(forest: &Forest, parent: Option<NodeKey>, filter: &ViewFilter) -> Vec<TreeView> {
    visible_children(forest, parent, filter)
        .into_iter()
        .filter_map(|key| {
            let node = forest.get(key)?;
            Some(TreeView {
                id: node.id().to_string(),
                label: node.label().to_string(),
                kind: node.kind_tag().to_string(),
                is_favorite: node.is_favorite(),
                is_hidden: node.is_hidden(),
                profile: node.profile().map(str::to_string),
                children: build_views(forest, Some(key), filter),
            })
        })
        .collect()
}
