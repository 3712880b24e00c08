// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Blueprint.
//!
//! Pure model and conversion logic. All I/O is reached through ports (traits)
//! defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or logging
//! - **No external crates**: Only std library, serde and thiserror
//! - **Immutable inputs**: converters borrow the model and return fresh output
//!
// Public API - what the world sees
pub mod convert;
pub mod deployment;
pub mod entities;
pub mod error;
pub mod value_objects;

// Re-exports for convenience
pub use convert::{
    BUILT_IN_ENTITY_OPTION, BUILT_IN_USER, ConversionOptions, EntityConverter, OptionConverter,
};
pub use deployment::{DeploymentConfig, DeploymentOptions, DeploymentOptionsResolver};
pub use entities::{
    ApplicationConfig, BaseName, CommunicationDescriptor, CommunicationLink, CommunicationSet,
    DslDocument, EntityDefinition, EntityMap, FieldDefinition, OptionMap, OptionValue,
    RelationshipDefinition, Validation, WorkspaceLayout,
};
pub use error::{DomainError, ErrorCategory};
pub use value_objects::{DeploymentTopology, RelationshipKind};

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    // ========================================================================
    // End-to-end conversion
    // ========================================================================

    fn library() -> EntityMap {
        let mut map = EntityMap::new();
        map.insert(
            "Author",
            EntityDefinition::new()
                .with_field(
                    FieldDefinition::new("name", "String").with_validation(Validation::Required),
                )
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
                        .display_field("name"),
                ),
        );
        map
    }

    #[test]
    fn entities_relationships_then_options() {
        let mut doc = EntityConverter::default().convert(&library()).unwrap();

        let mut book_options = OptionMap::new();
        book_options.insert("dto".into(), "mapstruct".into());
        let named = BTreeMap::from([("Book".to_string(), book_options)]);
        OptionConverter::new().apply(&named, &mut doc).unwrap();

        let expected = "\
entity Author {
  name String required
}

entity Book {
  title String
}

relationship ManyToOne {
  Book{author(name)} to Author{books}
}

dto Book with mapstruct
";
        assert_eq!(doc.render(), expected);
    }

    #[test]
    fn failed_conversion_yields_no_document() {
        let mut map = library();
        map.insert(
            "Shelf",
            EntityDefinition::new().with_relationship(RelationshipDefinition::new(
                "location",
                RelationshipKind::ManyToOne,
                "Ghost",
            )),
        );

        let result = EntityConverter::default().convert(&map);
        assert!(matches!(
            result,
            Err(DomainError::UnknownRelationshipTarget { ref target, .. }) if target == "Ghost"
        ));
    }

    // ========================================================================
    // Deployment defaults feeding a config
    // ========================================================================

    #[test]
    fn resolver_fragment_merges_without_overwriting() {
        let mut app = ApplicationConfig::new("store").with_option("monitoring", "prometheus");
        let fragment = DeploymentOptionsResolver::defaults(DeploymentTopology::Openshift).fragment();

        let added = app.merge_defaults(&fragment);

        assert_eq!(added, fragment.len() - 1);
        assert_eq!(app.option("monitoring"), Some(&OptionValue::from("prometheus")));
        assert_eq!(app.option("storageType"), Some(&OptionValue::from("ephemeral")));
    }

    #[test]
    fn domain_error_categories() {
        let err = DomainError::UnknownDeploymentTopology {
            tag: "swarm".into(),
            expected: "docker-compose".into(),
        };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());

        let err = BaseName::parse("../etc").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Validation);
    }
}
