//! The `ApplicationConfig` aggregate and its flat option map.
//!
//! An `ApplicationConfig` is built by an external loading layer (JSON or TOML)
//! and handed to the converters and the exporter as a read-only input.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entities::entity::{EntityDefinition, EntityMap};

/// Flat option name → value mapping.
///
/// A `BTreeMap` so that serialization of the same pairs is stable no matter
/// the order they were inserted in.
pub type OptionMap = BTreeMap<String, OptionValue>;

/// A single option value as it appears in JSON-shaped configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(i64),
    Text(String),
    Set(BTreeSet<String>),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn empty_set() -> Self {
        Self::Set(BTreeSet::new())
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Set(items) => {
                let joined = items.iter().map(String::as_str).collect::<Vec<_>>();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<BTreeSet<String>> for OptionValue {
    fn from(value: BTreeSet<String>) -> Self {
        Self::Set(value)
    }
}

/// One application's configuration: identity, options and entity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationConfig {
    /// Unique id within a workspace; also the export directory name.
    pub base_name: String,

    /// Broker technology shared with a communicating peer application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_broker: Option<String>,

    #[serde(default)]
    pub options: OptionMap,

    #[serde(default)]
    pub entities: EntityMap,
}

impl ApplicationConfig {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            message_broker: None,
            options: OptionMap::new(),
            entities: EntityMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_entity(mut self, name: impl Into<String>, entity: EntityDefinition) -> Self {
        self.entities.insert(name, entity);
        self
    }

    pub fn with_message_broker(mut self, broker: impl Into<String>) -> Self {
        self.message_broker = Some(broker.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Merge a default fragment: absent keys are inserted, present keys win.
    ///
    /// Returns the number of keys that were added.
    pub fn merge_defaults(&mut self, fragment: &OptionMap) -> usize {
        let mut added = 0;
        for (key, value) in fragment {
            if !self.options.contains_key(key) {
                self.options.insert(key.clone(), value.clone());
                added += 1;
            }
        }
        added
    }
}
