//! Application layer for Arbor.
//!
//! Wires the domain core to its infrastructure: the default kind registry and
//! the explorer use case that every front end drives.

pub mod explorer_service;
pub mod registry;

pub use explorer_service::ExplorerService;
pub use registry::default_registry;
