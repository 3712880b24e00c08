//! Loads application configurations and communication sets from disk.
//!
//! # Accepted inputs
//!
//! A JSON or TOML file holding any of:
//!
//! ```text
//! { "baseName": "store", ... }                    ← one application
//! [ { "baseName": "store" }, ... ]                ← several (JSON only)
//! { "applications": [ { "baseName": "store" } ] } ← several, wrapped
//! ```
//!
//! Or a directory: every `.json` / `.toml` file directly inside it is loaded,
//! in file-name order, and the results are concatenated.
//!
//! Entity order is the order of the document, in both formats.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use blueprint_core::{
    application::ApplicationError,
    domain::{ApplicationConfig, CommunicationSet},
    error::BlueprintError,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unsupported input {path} (expected a .json or .toml file)")]
    UnsupportedFormat { path: PathBuf },

    #[error("no application configurations found in {path}")]
    Empty { path: PathBuf },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Json { path, .. }
            | Self::Toml { path, .. }
            | Self::UnsupportedFormat { path }
            | Self::Empty { path } => path,
        }
    }
}

impl From<LoadError> for BlueprintError {
    fn from(err: LoadError) -> Self {
        ApplicationError::LoadFailed {
            path: err.path().to_path_buf(),
            reason: err.to_string(),
        }
        .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Toml,
}

impl InputFormat {
    /// Format by file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

/// Reads configuration inputs. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every application in a file or directory.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_applications(&self, path: &Path) -> Result<Vec<ApplicationConfig>, LoadError> {
        let apps = if path.is_dir() {
            let mut apps = Vec::new();
            for file in self.input_files(path)? {
                apps.extend(self.load_file(&file)?);
            }
            apps
        } else {
            self.load_file(path)?
        };

        if apps.is_empty() {
            return Err(LoadError::Empty {
                path: path.to_path_buf(),
            });
        }

        debug!(count = apps.len(), "Applications loaded");
        Ok(apps)
    }

    /// Load a communication set: `{"communications": [...]}` or a bare array.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_communications(&self, path: &Path) -> Result<CommunicationSet, LoadError> {
        let value = self.read_value(path)?;
        let value = match value {
            Value::Array(links) => {
                let mut wrapped = serde_json::Map::new();
                wrapped.insert("communications".into(), Value::Array(links));
                Value::Object(wrapped)
            }
            other => other,
        };

        let set: CommunicationSet = from_value(path, value)?;
        debug!(links = set.communications.len(), "Communications loaded");
        Ok(set)
    }

    /// Parse application configurations from in-memory content.
    pub fn parse_applications(
        &self,
        content: &str,
        format: InputFormat,
        origin: &Path,
    ) -> Result<Vec<ApplicationConfig>, LoadError> {
        let value = parse_value(content, format, origin)?;

        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| from_value(origin, item))
                .collect(),
            Value::Object(mut map) if !map.contains_key("baseName") => {
                match map.remove("applications") {
                    Some(apps) => from_value(origin, apps),
                    None => Ok(vec![from_value(origin, Value::Object(map))?]),
                }
            }
            other => Ok(vec![from_value(origin, other)?]),
        }
    }

    fn load_file(&self, path: &Path) -> Result<Vec<ApplicationConfig>, LoadError> {
        let format = InputFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let content = read(path)?;
        let apps = self.parse_applications(&content, format, path)?;
        debug!(file = %path.display(), count = apps.len(), "Parsed input file");
        Ok(apps)
    }

    fn read_value(&self, path: &Path) -> Result<Value, LoadError> {
        let format = InputFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        parse_value(&read(path)?, format, path)
    }

    /// Config files directly inside `dir`, sorted by file name.
    fn input_files(&self, dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| LoadError::Io {
                path: e.path().unwrap_or(dir).to_path_buf(),
                source: e.into(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if InputFormat::from_path(entry.path()).is_none() {
                debug!(file = %entry.path().display(), "Skipping non-config file");
                continue;
            }
            files.push(entry.into_path());
        }

        Ok(files)
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_value(content: &str, format: InputFormat, origin: &Path) -> Result<Value, LoadError> {
    match format {
        InputFormat::Json => serde_json::from_str(content).map_err(|source| LoadError::Json {
            path: origin.to_path_buf(),
            source,
        }),
        InputFormat::Toml => toml::from_str(content).map_err(|source| LoadError::Toml {
            path: origin.to_path_buf(),
            source,
        }),
    }
}

fn from_value<T: DeserializeOwned>(origin: &Path, value: Value) -> Result<T, LoadError> {
    serde_json::from_value(value).map_err(|source| LoadError::Json {
        path: origin.to_path_buf(),
        source,
    })
}
