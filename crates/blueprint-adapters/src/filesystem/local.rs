//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use blueprint_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{BlueprintError, BlueprintResult},
};
use tracing::trace;

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir(&self, path: &Path) -> BlueprintResult<()> {
        trace!(path = %path.display(), "create_dir");
        // Exclusive: an entry created after the caller's check is AlreadyExists.
        std::fs::create_dir(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> BlueprintResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "write_file");
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        // Dangling symlinks count as existing entries.
        path.symlink_metadata().is_ok()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> BlueprintError {
    if e.kind() == io::ErrorKind::AlreadyExists {
        return ApplicationError::AlreadyExists {
            path: path.to_path_buf(),
        }
        .into();
    }

    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
