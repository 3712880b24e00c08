// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for reporting after the fact)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error(
        "entity '{entity}', relationship '{relationship}', targets unknown entity '{target}'"
    )]
    UnknownRelationshipTarget {
        entity: String,
        relationship: String,
        target: String,
    },

    #[error("invalid value '{value}' for option '{option}' (expected one of: {expected})")]
    InvalidOptionValue {
        option: String,
        value: String,
        expected: String,
    },

    #[error("invalid application base name '{name}': {reason}")]
    InvalidBaseName { name: String, reason: String },

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("unknown deployment topology '{tag}' (expected one of: {expected})")]
    UnknownDeploymentTopology { tag: String, expected: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownRelationshipTarget { entity, target, .. } => vec![
                format!("Declare an entity named '{target}'"),
                format!("Or fix the relationship target in entity '{entity}'"),
            ],
            Self::InvalidOptionValue {
                option, expected, ..
            } => vec![format!("'{option}' accepts: {expected}")],
            Self::InvalidBaseName { .. } => vec![
                "A base name becomes a directory name: use a single path segment".into(),
                "Examples: store, gateway, invoice_service".into(),
            ],
            Self::UnknownDeploymentTopology { expected, .. } => vec![
                format!("Supported topologies: {expected}"),
                "Tags ignore case and separators; k8s and compose are aliases".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownRelationshipTarget { .. }
            | Self::InvalidOptionValue { .. }
            | Self::InvalidBaseName { .. } => ErrorCategory::Validation,
            Self::UnknownDeploymentTopology { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
}
