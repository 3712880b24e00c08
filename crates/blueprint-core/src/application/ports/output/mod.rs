//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `blueprint-adapters` crate provides implementations.

use crate::error::BlueprintResult;
use std::path::Path;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `blueprint_adapters::filesystem::LocalFilesystem` (production)
/// - `blueprint_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - `create_dir` is exclusive: an existing entry at `path` is an
///   `ApplicationError::AlreadyExists`, never a silent success
/// - The parent of `path` must already exist
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create exactly one directory; fail if anything exists at `path`.
    fn create_dir(&self, path: &Path) -> BlueprintResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> BlueprintResult<()>;

    /// Check if any entry (file, directory or link) exists at path.
    fn exists(&self, path: &Path) -> bool;
}
