//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not in the model.
//! Model errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// An exclusive create found the entry already present.
    ///
    /// Raised by `Filesystem` adapters; the exporter reports it as `Collision`.
    #[error("Entry already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// An application directory would overwrite an existing entry.
    #[error(
        "Application '{base_name}' collides with existing entry {path} (already exported: {})",
        display_exported(.exported)
    )]
    Collision {
        base_name: String,
        path: PathBuf,
        /// Base names exported earlier in the same batch.
        exported: Vec<String>,
    },

    /// In-memory adapter state is unusable (lock poisoned).
    #[error("Filesystem state lock poisoned")]
    LockPoisoned,

    /// An input file could not be read or parsed.
    #[error("Failed to load {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },
}

fn display_exported(exported: &[String]) -> String {
    if exported.is_empty() {
        "none".to_string()
    } else {
        exported.join(", ")
    }
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::AlreadyExists { path } => vec![
                format!("Remove or rename: {}", path.display()),
            ],
            Self::Collision {
                base_name,
                exported,
                ..
            } => {
                let mut hints = vec![
                    format!("Rename the application '{base_name}' or remove the existing entry"),
                    "Export into an empty directory with --output".into(),
                ];
                if !exported.is_empty() {
                    hints.push(format!(
                        "These directories were created before the failure: {}",
                        exported.join(", ")
                    ));
                }
                hints
            }
            Self::LoadFailed { .. } => vec![
                "Input files must be JSON or TOML application configurations".into(),
                "A file may hold one application, an array, or {\"applications\": [...]}".into(),
            ],
            Self::LockPoisoned => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Collision { .. } | Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::LoadFailed { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
