//! Durable storage for the tree document and configuration files.

pub mod atomic_file;
pub mod json_file_store;

pub use atomic_file::AtomicFile;
pub use json_file_store::JsonFileTreeStore;
