//! Entity graph: definitions, fields, validations and relationships.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::entities::application::{OptionMap, OptionValue};
use crate::domain::value_objects::RelationshipKind;

// ── EntityMap ─────────────────────────────────────────────────────────────────

/// Entity name → definition, iterated in insertion order.
///
/// Callers own the order (usually declaration order); the converters rely on
/// it for deterministic output. Re-inserting an existing name replaces the
/// definition in place and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityMap {
    entries: IndexMap<String, EntityDefinition>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entity: EntityDefinition,
    ) -> Option<EntityDefinition> {
        self.entries.insert(name.into(), entity)
    }

    pub fn get(&self, name: &str) -> Option<&EntityDefinition> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityDefinition)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<N: Into<String>> FromIterator<(N, EntityDefinition)> for EntityMap {
    fn from_iter<I: IntoIterator<Item = (N, EntityDefinition)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, entity)| (name.into(), entity))
                .collect(),
        }
    }
}

// ── EntityDefinition ──────────────────────────────────────────────────────────

/// One entity: ordered fields, ordered relationships, entity-level options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,

    /// Entity-scoped options such as `dto` or `pagination`.
    #[serde(default, skip_serializing_if = "OptionMap::is_empty")]
    pub options: OptionMap,
}

impl EntityDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_relationship(mut self, relationship: RelationshipDefinition) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_javadoc(mut self, javadoc: impl Into<String>) -> Self {
        self.javadoc = Some(javadoc.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

// ── FieldDefinition ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    #[serde(rename = "fieldName")]
    pub name: String,

    #[serde(rename = "fieldType")]
    pub field_type: String,

    #[serde(default, rename = "fieldValidateRules")]
    pub validations: Vec<Validation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javadoc: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            validations: Vec::new(),
            javadoc: None,
        }
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validations.push(validation);
        self
    }

    pub fn with_javadoc(mut self, javadoc: impl Into<String>) -> Self {
        self.javadoc = Some(javadoc.into());
        self
    }
}

/// Field validation rule.
///
/// JSON form: `"required"` for flags, `{"maxlength": 42}` for parameterized rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    Required,
    Unique,
    MinLength(u64),
    MaxLength(u64),
    Min(i64),
    Max(i64),
    MinBytes(u64),
    MaxBytes(u64),
    Pattern(String),
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::Unique => f.write_str("unique"),
            Self::MinLength(n) => write!(f, "minlength({n})"),
            Self::MaxLength(n) => write!(f, "maxlength({n})"),
            Self::Min(n) => write!(f, "min({n})"),
            Self::Max(n) => write!(f, "max({n})"),
            Self::MinBytes(n) => write!(f, "minbytes({n})"),
            Self::MaxBytes(n) => write!(f, "maxbytes({n})"),
            Self::Pattern(p) => write!(f, "pattern(/{}/)", escape_slashes(p)),
        }
    }
}

/// Escapes `/` so a pattern cannot end its regex literal early. Slashes that
/// are already escaped are kept as they are.
fn escape_slashes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut escaped = false;
    for c in pattern.chars() {
        if c == '/' && !escaped {
            out.push('\\');
        }
        escaped = c == '\\' && !escaped;
        out.push(c);
    }
    out
}

// ── RelationshipDefinition ────────────────────────────────────────────────────

/// One directional relationship reference, declared on its source entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDefinition {
    /// Field name on the declaring entity.
    pub relationship_name: String,

    pub other_entity_name: String,

    pub relationship_type: RelationshipKind,

    #[serde(default)]
    pub owner_side: bool,

    /// Field name on the other entity, when the pair is bidirectional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_entity_relationship_name: Option<String>,

    /// Field of the other entity used for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_entity_field: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub options: BTreeSet<String>,
}

impl RelationshipDefinition {
    pub fn new(
        relationship_name: impl Into<String>,
        kind: RelationshipKind,
        other_entity_name: impl Into<String>,
    ) -> Self {
        Self {
            relationship_name: relationship_name.into(),
            other_entity_name: other_entity_name.into(),
            relationship_type: kind,
            owner_side: false,
            other_entity_relationship_name: None,
            other_entity_field: None,
            options: BTreeSet::new(),
        }
    }

    pub fn owner(mut self) -> Self {
        self.owner_side = true;
        self
    }

    pub fn inverse_name(mut self, name: impl Into<String>) -> Self {
        self.other_entity_relationship_name = Some(name.into());
        self
    }

    pub fn display_field(mut self, field: impl Into<String>) -> Self {
        self.other_entity_field = Some(field.into());
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.insert(option.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.options.contains(REQUIRED_OPTION)
    }
}

/// Relationship option rendered inside the field braces instead of `with`.
pub const REQUIRED_OPTION: &str = "required";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_map_preserves_insertion_order() {
        let mut map = EntityMap::new();
        map.insert("Zebra", EntityDefinition::new());
        map.insert("Apple", EntityDefinition::new());
        map.insert("Mango", EntityDefinition::new());

        assert_eq!(map.names().collect::<Vec<_>>(), ["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn entity_map_reinsert_keeps_position() {
        let mut map = EntityMap::new();
        map.insert("A", EntityDefinition::new());
        map.insert("B", EntityDefinition::new());
        let old = map.insert("A", EntityDefinition::new().with_table_name("a_table"));

        assert!(old.is_some());
        assert_eq!(map.names().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(map.get("A").unwrap().table_name.as_deref(), Some("a_table"));
    }

    #[test]
    fn entity_map_collects_with_last_definition_winning() {
        let map: EntityMap = [
            ("Order", EntityDefinition::new()),
            ("Customer", EntityDefinition::new()),
            ("Order", EntityDefinition::new().with_table_name("orders")),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.len(), 2);
        assert_eq!(map.names().collect::<Vec<_>>(), ["Order", "Customer"]);
        assert_eq!(map.get("Order").unwrap().table_name.as_deref(), Some("orders"));
    }

    #[test]
    fn entity_map_json_keeps_document_order() {
        let json = r#"{"Zebra": {}, "Apple": {"fields": [{"fieldName": "id", "fieldType": "Long"}]}}"#;
        let map: EntityMap = serde_json::from_str(json).unwrap();

        assert_eq!(map.names().collect::<Vec<_>>(), ["Zebra", "Apple"]);
        let back = serde_json::to_string(&map).unwrap();
        assert!(back.find("Zebra").unwrap() < back.find("Apple").unwrap());
    }

    #[test]
    fn validation_json_forms() {
        let rules: Vec<Validation> =
            serde_json::from_str(r#"["required", {"maxlength": 20}, {"pattern": "^[A-Z]"}]"#)
                .unwrap();
        assert_eq!(
            rules,
            vec![
                Validation::Required,
                Validation::MaxLength(20),
                Validation::Pattern("^[A-Z]".into())
            ]
        );
    }

    #[test]
    fn validation_display() {
        assert_eq!(Validation::MinLength(3).to_string(), "minlength(3)");
        assert_eq!(Validation::Pattern("[a-z]+".into()).to_string(), "pattern(/[a-z]+/)");
    }

    #[test]
    fn pattern_slashes_are_escaped_once() {
        assert_eq!(
            Validation::Pattern("^\\d+/\\d+$".into()).to_string(),
            "pattern(/^\\d+\\/\\d+$/)"
        );
        assert_eq!(
            Validation::Pattern("a\\/b".into()).to_string(),
            "pattern(/a\\/b/)"
        );
    }

    #[test]
    fn relationship_json_shape() {
        let rel: RelationshipDefinition = serde_json::from_str(
            r#"{"relationshipName": "author", "otherEntityName": "Author",
                "relationshipType": "many-to-one", "options": ["required"]}"#,
        )
        .unwrap();

        assert_eq!(rel.relationship_type, RelationshipKind::ManyToOne);
        assert!(!rel.owner_side);
        assert!(rel.is_required());
    }
}
