use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::domain::error::DomainError;

/// An application base name that is safe to use as a directory name.
///
/// Invariant: exactly one normal path component. No separators, no `.` or
/// `..`, never empty, never absolute. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BaseName(String);

impl BaseName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidBaseName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.trim().is_empty() {
            return Err(invalid("base name is empty"));
        }
        if raw.contains(['/', '\\']) {
            return Err(invalid("base name contains a path separator"));
        }

        let mut components = Path::new(raw).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self(raw.to_string())),
            _ => Err(invalid("base name must be a single directory name")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for BaseName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for BaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application directories created under one workspace root.
///
/// Produced fresh by each export batch; records directories in creation order.
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    root: PathBuf,
    applications: Vec<BaseName>,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            applications: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory an application with this base name is exported to.
    pub fn directory_for(&self, base_name: &BaseName) -> PathBuf {
        self.root.join(base_name)
    }

    /// Record a created directory. Returns `false` if it was already recorded.
    pub fn record(&mut self, base_name: BaseName) -> bool {
        if self.contains(base_name.as_str()) {
            return false;
        }
        self.applications.push(base_name);
        true
    }

    pub fn contains(&self, base_name: &str) -> bool {
        self.applications.iter().any(|b| b.as_str() == base_name)
    }

    /// Base names recorded so far, in creation order.
    pub fn names(&self) -> Vec<String> {
        self.applications.iter().map(|b| b.to_string()).collect()
    }

    pub fn directories(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.applications.iter().map(|b| self.directory_for(b))
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_accepts_plain_names() {
        assert_eq!(BaseName::parse("store").unwrap().as_str(), "store");
        assert!(BaseName::parse("invoice_service-2").is_ok());
    }

    #[test]
    fn base_name_rejects_paths() {
        for bad in ["", "  ", "a/b", "..", ".", "/abs", "a\\b"] {
            assert!(
                matches!(
                    BaseName::parse(bad),
                    Err(DomainError::InvalidBaseName { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn layout_records_once() {
        let mut layout = WorkspaceLayout::new("/ws");
        let store = BaseName::parse("store").unwrap();

        assert!(layout.record(store.clone()));
        assert!(!layout.record(store.clone()));
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.directory_for(&store), PathBuf::from("/ws/store"));
        assert_eq!(layout.names(), vec!["store".to_string()]);
    }
}
