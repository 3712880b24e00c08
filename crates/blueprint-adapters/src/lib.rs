//! Infrastructure adapters for Blueprint.
//!
//! This crate implements the ports defined in `blueprint-core::application::ports`
//! and reads application configurations from disk.
//! It contains all external dependencies and I/O operations.

pub mod config_loader;
pub mod filesystem;

// Re-export commonly used adapters
pub use config_loader::{ConfigLoader, InputFormat, LoadError};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
