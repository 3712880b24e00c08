//! Entity graph → DSL entity and relationship declarations.

use std::collections::{BTreeSet, HashMap};

use crate::domain::entities::dsl::{
    DslDocument, EntityDeclaration, RelationshipDeclaration, RelationshipEnd, Statement,
};
use crate::domain::entities::entity::{EntityMap, REQUIRED_OPTION, RelationshipDefinition};
use crate::domain::error::DomainError;
use crate::domain::value_objects::RelationshipKind;

/// Name of the user entity the generator provides on its own.
pub const BUILT_IN_USER: &str = "User";

/// Relationship option marking a target that is not declared in the model.
pub const BUILT_IN_ENTITY_OPTION: &str = "builtInEntity";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionOptions {
    /// When `false`, relationships may target the built-in `User` entity
    /// without declaring it.
    pub skip_user_management: bool,
}

impl ConversionOptions {
    pub fn skip_user_management(mut self, skip: bool) -> Self {
        self.skip_user_management = skip;
        self
    }
}

/// Converts an [`EntityMap`] into entity and relationship statements.
///
/// # Output order
///
/// 1. One entity declaration per map entry, in map order
/// 2. One relationship declaration per logical relationship, in order of the
///    first half seen while scanning entities and their relationship lists
///
/// A symmetric pair (e.g. `A one-to-many B` plus `B many-to-one A`) is one
/// logical relationship and is written once, from its owning side.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityConverter {
    options: ConversionOptions,
}

/// One directional relationship reference and the entity declaring it.
#[derive(Debug, Clone, Copy)]
struct Half<'a> {
    source: &'a str,
    rel: &'a RelationshipDefinition,
}

impl<'a> Half<'a> {
    fn target(&self) -> &'a str {
        &self.rel.other_entity_name
    }

    /// Whether `other` can be the inverse reference of `self`.
    fn pairs_with(&self, other: &Half<'_>) -> bool {
        let names_agree = |a: &RelationshipDefinition, b: &RelationshipDefinition| {
            a.other_entity_relationship_name
                .as_deref()
                .is_none_or(|name| name == b.relationship_name)
        };
        let linked = self.rel.other_entity_relationship_name.is_some()
            || other.rel.other_entity_relationship_name.is_some();

        names_agree(self.rel, other.rel)
            && names_agree(other.rel, self.rel)
            // Two unannotated self references are two relationships.
            && (self.source != self.target() || linked)
    }
}

/// A logical relationship: the first half seen plus its inverse, if any.
struct Logical<'a> {
    first: Half<'a>,
    second: Option<Half<'a>>,
}

impl<'a> Logical<'a> {
    /// Owning half first.
    fn ordered(&self) -> (Half<'a>, Option<Half<'a>>) {
        let Some(second) = self.second else {
            return (self.first, None);
        };

        let second_owns = match (self.first.rel.owner_side, second.rel.owner_side) {
            (false, true) => true,
            (true, false) => false,
            _ => {
                self.first.rel.relationship_type == RelationshipKind::OneToMany
                    && second.rel.relationship_type == RelationshipKind::ManyToOne
            }
        };

        if second_owns {
            (second, Some(self.first))
        } else {
            (self.first, Some(second))
        }
    }
}

type PairKey<'a> = (&'a str, &'a str, RelationshipKind);

impl EntityConverter {
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ConversionOptions {
        self.options
    }

    /// Convert the whole graph. Fails on the first dangling relationship
    /// target; no partial document is returned.
    pub fn convert(&self, entities: &EntityMap) -> Result<DslDocument, DomainError> {
        self.check_targets(entities)?;

        let mut document = DslDocument::new();
        document.extend(
            entities
                .iter()
                .map(|(name, def)| Statement::Entity(EntityDeclaration::from_definition(name, def))),
        );

        for logical in pair_up(entities) {
            document.push(Statement::Relationship(self.declare(&logical, entities)));
        }

        Ok(document)
    }

    fn check_targets(&self, entities: &EntityMap) -> Result<(), DomainError> {
        for (name, def) in entities.iter() {
            for rel in &def.relationships {
                let target = rel.other_entity_name.as_str();
                if !entities.contains(target) && !self.is_built_in(target, entities) {
                    return Err(DomainError::UnknownRelationshipTarget {
                        entity: name.to_string(),
                        relationship: rel.relationship_name.clone(),
                        target: target.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn is_built_in(&self, target: &str, entities: &EntityMap) -> bool {
        !self.options.skip_user_management
            && target.eq_ignore_ascii_case(BUILT_IN_USER)
            && !entities.contains(target)
    }

    fn declare(&self, logical: &Logical<'_>, entities: &EntityMap) -> RelationshipDeclaration {
        let (owner, inverse) = logical.ordered();
        let built_in = self.is_built_in(owner.target(), entities);

        let from = RelationshipEnd {
            entity: owner.source.to_string(),
            field: Some(owner.rel.relationship_name.clone()),
            display_field: owner.rel.other_entity_field.clone(),
            required: owner.rel.is_required(),
        };

        let to = match inverse {
            Some(inverse) => RelationshipEnd {
                entity: inverse.source.to_string(),
                field: Some(inverse.rel.relationship_name.clone()),
                display_field: inverse.rel.other_entity_field.clone(),
                required: inverse.rel.is_required(),
            },
            None => RelationshipEnd {
                entity: if built_in {
                    BUILT_IN_USER.to_string()
                } else {
                    owner.target().to_string()
                },
                field: owner.rel.other_entity_relationship_name.clone(),
                display_field: None,
                required: false,
            },
        };

        let mut options: BTreeSet<String> = std::iter::once(owner)
            .chain(inverse)
            .flat_map(|half| half.rel.options.iter())
            .filter(|option| option.as_str() != REQUIRED_OPTION)
            .cloned()
            .collect();
        if built_in {
            options.insert(BUILT_IN_ENTITY_OPTION.to_string());
        }

        RelationshipDeclaration {
            kind: owner.rel.relationship_type,
            from,
            to,
            options,
        }
    }
}

/// Single pass over every relationship list, matching each half against the
/// unmatched halves pointing back at it.
fn pair_up(entities: &EntityMap) -> Vec<Logical<'_>> {
    let mut logical: Vec<Logical<'_>> = Vec::new();
    let mut unmatched: HashMap<PairKey<'_>, Vec<usize>> = HashMap::new();

    for (source, def) in entities.iter() {
        for rel in &def.relationships {
            let half = Half { source, rel };
            let wanted = (half.target(), source, rel.relationship_type.inverse());

            let matched = unmatched.get_mut(&wanted).and_then(|candidates| {
                let pos = candidates
                    .iter()
                    .position(|&idx| logical[idx].first.pairs_with(&half))?;
                Some(candidates.remove(pos))
            });

            match matched {
                Some(idx) => logical[idx].second = Some(half),
                None => {
                    unmatched
                        .entry((source, half.target(), rel.relationship_type))
                        .or_default()
                        .push(logical.len());
                    logical.push(Logical {
                        first: half,
                        second: None,
                    });
                }
            }
        }
    }

    logical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::entity::{EntityDefinition, FieldDefinition};

    fn author_book() -> EntityMap {
        let mut map = EntityMap::new();
        map.insert(
            "Author",
            EntityDefinition::new()
                .with_field(FieldDefinition::new("name", "String"))
                .with_relationship(
                    RelationshipDefinition::new("books", RelationshipKind::OneToMany, "Book")
                        .inverse_name("author"),
                ),
        );
        map.insert(
            "Book",
            EntityDefinition::new()
                .with_field(FieldDefinition::new("title", "String"))
                .with_relationship(
                    RelationshipDefinition::new("author", RelationshipKind::ManyToOne, "Author")
                        .inverse_name("books")
                        .display_field("name")
                        .with_option("required"),
                ),
        );
        map
    }

    fn convert(map: &EntityMap) -> DslDocument {
        EntityConverter::default().convert(map).unwrap()
    }

    #[test]
    fn emits_one_entity_per_entry_in_order() {
        let doc = convert(&author_book());
        let names: Vec<_> = doc.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Author", "Book"]);
    }

    #[test]
    fn symmetric_pair_is_emitted_once_from_many_to_one_side() {
        let doc = convert(&author_book());
        let rels: Vec<_> = doc.relationships().collect();

        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].kind, RelationshipKind::ManyToOne);
        assert_eq!(rels[0].from.entity, "Book");
        assert_eq!(rels[0].to.entity, "Author");
        assert_eq!(rels[0].to.field.as_deref(), Some("books"));
        assert!(rels[0].from.required);
        assert!(rels[0].options.is_empty());
    }

    #[test]
    fn unannotated_pair_is_emitted_once() {
        let mut map = EntityMap::new();
        map.insert(
            "A",
            EntityDefinition::new()
                .with_field(FieldDefinition::new("id", "Long"))
                .with_relationship(RelationshipDefinition::new("b", RelationshipKind::OneToMany, "B")),
        );
        map.insert(
            "B",
            EntityDefinition::new()
                .with_field(FieldDefinition::new("id", "Long"))
                .with_relationship(RelationshipDefinition::new("a", RelationshipKind::ManyToOne, "A")),
        );

        let doc = convert(&map);
        let rels: Vec<_> = doc.relationships().collect();

        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].kind, RelationshipKind::ManyToOne);
        assert_eq!(rels[0].from.entity, "B");
        assert_eq!(rels[0].to.entity, "A");
    }

    #[test]
    fn owner_side_flag_wins() {
        let mut map = EntityMap::new();
        map.insert(
            "Car",
            EntityDefinition::new().with_relationship(
                RelationshipDefinition::new("driver", RelationshipKind::OneToOne, "Driver")
                    .inverse_name("car"),
            ),
        );
        map.insert(
            "Driver",
            EntityDefinition::new().with_relationship(
                RelationshipDefinition::new("car", RelationshipKind::OneToOne, "Car")
                    .inverse_name("driver")
                    .owner(),
            ),
        );

        let doc = convert(&map);
        let rels: Vec<_> = doc.relationships().collect();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].from.entity, "Driver");
    }

    #[test]
    fn incompatible_names_are_not_paired() {
        let mut map = author_book();
        map.insert(
            "Book",
            EntityDefinition::new().with_relationship(
                RelationshipDefinition::new("editor", RelationshipKind::ManyToOne, "Author")
                    .inverse_name("edited"),
            ),
        );

        assert_eq!(convert(&map).relationships().count(), 2);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let mut map = author_book();
        map.insert(
            "Review",
            EntityDefinition::new().with_relationship(RelationshipDefinition::new(
                "ghost",
                RelationshipKind::ManyToOne,
                "Ghost",
            )),
        );

        let err = EntityConverter::default().convert(&map).unwrap_err();
        assert!(matches!(err, DomainError::UnknownRelationshipTarget { .. }));
        let message = err.to_string();
        assert!(message.contains("Ghost"));
        assert!(message.contains("Review"));
        assert!(message.contains("ghost"));
    }

    fn owned_by_user() -> EntityMap {
        let mut map = EntityMap::new();
        map.insert(
            "Order",
            EntityDefinition::new().with_relationship(
                RelationshipDefinition::new("user", RelationshipKind::ManyToOne, "User")
                    .display_field("login"),
            ),
        );
        map
    }

    #[test]
    fn built_in_user_is_available_when_user_management_is_kept() {
        let doc = convert(&owned_by_user());
        let rel = doc.relationships().next().unwrap();

        assert_eq!(rel.to.entity, BUILT_IN_USER);
        assert!(rel.options.contains(BUILT_IN_ENTITY_OPTION));
        assert_eq!(
            rel.to_string(),
            "relationship ManyToOne {\n  Order{user(login)} to User with builtInEntity\n}"
        );
    }

    #[test]
    fn user_must_be_declared_when_user_management_is_skipped() {
        let converter =
            EntityConverter::new(ConversionOptions::default().skip_user_management(true));
        let err = converter.convert(&owned_by_user()).unwrap_err();
        assert!(err.to_string().contains("User"));

        let mut map = owned_by_user();
        map.insert("User", EntityDefinition::new());
        let doc = converter.convert(&map).unwrap();
        assert!(doc.relationships().next().unwrap().options.is_empty());
    }

    #[test]
    fn unannotated_self_references_stay_separate() {
        let mut map = EntityMap::new();
        map.insert(
            "Employee",
            EntityDefinition::new()
                .with_relationship(RelationshipDefinition::new(
                    "mentor",
                    RelationshipKind::OneToOne,
                    "Employee",
                ))
                .with_relationship(RelationshipDefinition::new(
                    "buddy",
                    RelationshipKind::OneToOne,
                    "Employee",
                )),
        );

        assert_eq!(convert(&map).relationships().count(), 2);
    }

    #[test]
    fn conversion_is_deterministic() {
        let map = author_book();
        assert_eq!(convert(&map).render(), convert(&map).render());
    }
}
