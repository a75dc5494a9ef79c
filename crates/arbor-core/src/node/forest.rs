//! Arena-backed forest of nodes.
//!
//! Nodes live in slots addressed by [`NodeKey`]. A parent holds its children's
//! keys in display order and each child holds its parent's key as a
//! non-owning back-reference. Removing a node frees its whole subtree.
//!
//! Freed slots are recycled. Each slot carries a generation that is bumped
//! when it is freed, and a [`NodeKey`] only resolves while its generation
//! matches, so a stale key misses instead of reaching the slot's new tenant.

use super::hooks::NodeOperation;
use super::model::Node;
use crate::error::{ArborError, Result};
use std::fmt;

/// Handle to a node slot in a [`Forest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    index: usize,
    generation: u32,
}

impl NodeKey {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}.{}", self.index, self.generation)
        }
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The set of root nodes and everything reachable from them.
#[derive(Debug, Default)]
pub struct Forest {
    slots: Vec<Slot>,
    free: Vec<usize>,
    roots: Vec<NodeKey>,
    live: usize,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of allocated slots, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.slots
            .get(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Like [`Forest::get`] but reports a missing node as an error.
    pub fn node(&self, key: NodeKey) -> Result<&Node> {
        self.get(key)
            .ok_or_else(|| ArborError::not_found("node", key.to_string()))
    }

    pub fn node_mut(&mut self, key: NodeKey) -> Result<&mut Node> {
        self.get_mut(key)
            .ok_or_else(|| ArborError::not_found("node", key.to_string()))
    }

    fn alloc(&mut self, mut node: Node, parent: Option<NodeKey>) -> NodeKey {
        node.parent = parent;
        node.children.clear();
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeKey {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeKey {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Empties a slot and queues it for reuse.
    fn release(&mut self, key: NodeKey) -> Option<Node> {
        let slot = self
            .slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.live -= 1;
        Some(node)
    }

    /// Appends a node to the root list.
    pub fn insert_root(&mut self, node: Node) -> NodeKey {
        let key = self.alloc(node, None);
        self.roots.push(key);
        key
    }

    /// Appends a node to `parent`'s children.
    pub fn insert_child(&mut self, parent: NodeKey, node: Node) -> Result<NodeKey> {
        if !self.contains(parent) {
            return Err(ArborError::not_found("node", parent.to_string()));
        }
        let key = self.alloc(node, Some(parent));
        self.node_mut(parent)?.children.push(key);
        Ok(key)
    }

    /// Inserts under `parent`, or as a root when `parent` is `None`.
    pub fn insert(&mut self, parent: Option<NodeKey>, node: Node) -> Result<NodeKey> {
        match parent {
            Some(parent) => self.insert_child(parent, node),
            None => Ok(self.insert_root(node)),
        }
    }

    /// Detaches a node from its parent (or the root list) and frees its
    /// subtree.
    ///
    /// The returned node has no parent and no children. Persisting the change
    /// is up to the caller.
    pub fn remove(&mut self, key: NodeKey) -> Result<Node> {
        self.detach(key)?;
        for descendant in self.descendants(key) {
            self.release(descendant);
        }
        let mut node = self
            .release(key)
            .ok_or_else(|| ArborError::not_found("node", key.to_string()))?;
        node.parent = None;
        node.children.clear();
        Ok(node)
    }

    /// Unlinks `key` from its parent's children or from the root list.
    fn detach(&mut self, key: NodeKey) -> Result<()> {
        let parent = self.node(key)?.parent;
        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.get_mut(parent) {
                    parent_node.children.retain(|child| *child != key);
                }
            }
            None => self.roots.retain(|root| *root != key),
        }
        self.node_mut(key)?.parent = None;
        Ok(())
    }

    /// Moves a node under a new parent (or to the root list).
    ///
    /// Rejects moves that would make a node its own ancestor.
    pub fn move_node(&mut self, key: NodeKey, new_parent: Option<NodeKey>) -> Result<()> {
        self.node(key)?;
        if let Some(target) = new_parent {
            self.node(target)?;
            if target == key || self.ancestors(target).contains(&key) {
                return Err(ArborError::tree(format!(
                    "cannot move {} under its own descendant {}",
                    key, target
                )));
            }
        }
        self.detach(key)?;
        match new_parent {
            Some(target) => {
                self.node_mut(target)?.children.push(key);
                self.node_mut(key)?.parent = Some(target);
            }
            None => self.roots.push(key),
        }
        Ok(())
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.get(key).and_then(|node| node.parent)
    }

    pub fn children(&self, key: NodeKey) -> Vec<NodeKey> {
        self.get(key)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Parent chain from the immediate parent up to the root.
    pub fn ancestors(&self, key: NodeKey) -> Vec<NodeKey> {
        std::iter::successors(self.parent(key), |k| self.parent(*k)).collect()
    }

    /// All nodes below `key` in pre-order, excluding `key`.
    pub fn descendants(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(key).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Every live node in pre-order, roots first.
    pub fn walk(&self) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.live);
        for root in &self.roots {
            out.push(*root);
            out.extend(self.descendants(*root));
        }
        out
    }

    pub fn depth(&self, key: NodeKey) -> usize {
        self.ancestors(key).len()
    }

    /// Finds a node by its persisted identifier.
    pub fn find_by_id(&self, id: &str) -> Option<NodeKey> {
        self.walk()
            .into_iter()
            .find(|key| self.get(*key).is_some_and(|node| node.id() == id))
    }

    /// Invokes every handler subscribed to `operation` on `key`, in
    /// registration order.
    ///
    /// The first failing handler stops the chain and its error is returned.
    /// A node with no handlers for the operation is left untouched.
    pub fn fire(&mut self, key: NodeKey, operation: NodeOperation) -> Result<()> {
        let handlers = self.node(key)?.hooks().handlers(operation);
        tracing::debug!(
            node = %key,
            operation = %operation,
            handlers = handlers.len(),
            "firing node operation"
        );
        for handler in handlers {
            handler(self, key)?;
        }
        Ok(())
    }
}
