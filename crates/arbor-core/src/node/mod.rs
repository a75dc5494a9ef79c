//! Node domain module.
//!
//! # Module Structure
//!
//! - `descriptor`: static per-kind field declarations and their inheritance
//! - `model`: the [`Node`] entity and the [`NodeKind`] trait every kind implements
//! - `hooks`: lifecycle operations and subscribed handlers
//! - `forest`: the arena that owns nodes and their parent/child links

pub mod descriptor;
mod forest;
mod hooks;
mod model;

pub use descriptor::{KindDescriptor, NODE, ancestry, serializable_fields, transient_fields};
pub use forest::{Forest, NodeKey};
pub use hooks::{HookHandler, HookSet, NodeOperation};
pub use model::{Node, NodeKind, decode_field};
