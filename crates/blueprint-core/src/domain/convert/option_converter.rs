//! Flat option maps → DSL option-application declarations.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::application::{OptionMap, OptionValue};
use crate::domain::entities::dsl::{
    ALL_TARGETS, DslDocument, OptionDeclaration, OptionTargets, Statement,
};
use crate::domain::error::DomainError;
use crate::domain::value_objects::{
    ClosedOption, DtoMapper, PaginationKind, SearchEngine, ServiceKind,
};

/// Whether an option applies to the whole application or to listed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionScope {
    Global,
    Entity,
}

/// Value shape of a recognized option.
#[derive(Debug, Clone, Copy)]
pub enum OptionKind {
    /// Unary: present when `true`, default `false`.
    Flag,
    /// Binary over a closed enumeration.
    Closed {
        parse: fn(&str) -> Result<&'static str, DomainError>,
        default: &'static str,
    },
    /// Binary over free text, default empty.
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub key: &'static str,
    pub scope: OptionScope,
    pub kind: OptionKind,
}

impl OptionSpec {
    const fn flag(key: &'static str, scope: OptionScope) -> Self {
        Self {
            key,
            scope,
            kind: OptionKind::Flag,
        }
    }

    const fn text(key: &'static str) -> Self {
        Self {
            key,
            scope: OptionScope::Entity,
            kind: OptionKind::Text,
        }
    }

    fn closed<T: ClosedOption>() -> Self {
        Self {
            key: T::KEY,
            scope: OptionScope::Entity,
            kind: OptionKind::Closed {
                parse: parse_closed::<T>,
                default: T::default().canonical(),
            },
        }
    }

    /// `Ok(None)` when the value equals the default and nothing is emitted;
    /// `Ok(Some(None))` for a set flag; `Ok(Some(Some(v)))` for a binary value.
    fn normalize(&self, value: &OptionValue) -> Result<Option<Option<String>>, DomainError> {
        let invalid = |expected: &str| DomainError::InvalidOptionValue {
            option: self.key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        };

        match self.kind {
            OptionKind::Flag => match value.as_bool() {
                Some(true) => Ok(Some(None)),
                Some(false) => Ok(None),
                None => Err(invalid("true, false")),
            },
            OptionKind::Closed { parse, default } => {
                let canonical = parse(&value.to_string())?;
                Ok((canonical != default).then(|| Some(canonical.to_string())))
            }
            OptionKind::Text => {
                let text = value.as_text().ok_or_else(|| invalid("any text"))?;
                Ok((!text.is_empty()).then(|| Some(text.to_string())))
            }
        }
    }
}

fn parse_closed<T: ClosedOption>(raw: &str) -> Result<&'static str, DomainError> {
    Ok(raw.parse::<T>()?.canonical())
}

/// Every recognized option, in canonical emission order.
pub fn option_catalog() -> [OptionSpec; 13] {
    use OptionScope::{Entity, Global};
    [
        OptionSpec::flag("skipClient", Global),
        OptionSpec::flag("skipServer", Global),
        OptionSpec::flag("readOnly", Entity),
        OptionSpec::flag("embedded", Entity),
        OptionSpec::flag("filter", Entity),
        OptionSpec::flag("noFluentMethod", Entity),
        OptionSpec::closed::<DtoMapper>(),
        OptionSpec::closed::<ServiceKind>(),
        OptionSpec::closed::<PaginationKind>(),
        OptionSpec::closed::<SearchEngine>(),
        OptionSpec::text("microservice"),
        OptionSpec::text("angularSuffix"),
        OptionSpec::text("clientRootFolder"),
    ]
}

/// Appends option declarations for named option sets.
///
/// Each source is either an entity name or [`ALL_TARGETS`] for options that
/// apply to every entity. Keys outside the catalog are ignored; a default
/// value produces nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionConverter;

impl OptionConverter {
    pub fn new() -> Self {
        Self
    }

    /// Validates every recognized key first; the document is untouched on error.
    ///
    /// When the wildcard source holds a non-default value, entities holding
    /// anything else (the default included) are listed after `except` and
    /// get their own declaration when their value is not the default.
    pub fn apply(
        &self,
        named_option_sets: &BTreeMap<String, OptionMap>,
        document: &mut DslDocument,
    ) -> Result<(), DomainError> {
        let mut declarations = Vec::new();

        for spec in option_catalog() {
            let mut wildcard: Option<Option<String>> = None;
            // entity → normalized value; `None` is the default
            let mut held: BTreeMap<&str, Option<Option<String>>> = BTreeMap::new();

            for (source, options) in named_option_sets {
                let Some(value) = options.get(spec.key) else {
                    continue;
                };
                let normalized = spec.normalize(value)?;
                if source == ALL_TARGETS {
                    wildcard = normalized;
                } else {
                    held.insert(source.as_str(), normalized);
                }
            }

            if spec.scope == OptionScope::Global {
                let values: BTreeSet<Option<String>> =
                    wildcard.into_iter().chain(held.into_values().flatten()).collect();
                declarations.extend(values.into_iter().map(|value| {
                    Statement::Option(OptionDeclaration::new(spec.key, value, OptionTargets::All))
                }));
                continue;
            }

            if let Some(value) = &wildcard {
                let excluded = held
                    .iter()
                    .filter(|(_, held_value)| held_value.as_ref() != Some(value))
                    .map(|(source, _)| source.to_string())
                    .collect();
                declarations.push(Statement::Option(
                    OptionDeclaration::new(spec.key, value.clone(), OptionTargets::All)
                        .except(excluded),
                ));
            }

            // value → entities holding it; `None` is a set flag
            let mut by_value: BTreeMap<Option<String>, Vec<String>> = BTreeMap::new();
            for (source, held_value) in held {
                let Some(held_value) = held_value else {
                    continue;
                };
                if wildcard.as_ref() != Some(&held_value) {
                    by_value.entry(held_value).or_default().push(source.to_string());
                }
            }
            declarations.extend(by_value.into_iter().map(|(value, sources)| {
                Statement::Option(OptionDeclaration::new(
                    spec.key,
                    value,
                    OptionTargets::Entities(sources),
                ))
            }));
        }

        document.extend(declarations);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts<const N: usize>(pairs: [(&str, OptionValue); N]) -> OptionMap {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn sets<const N: usize>(entries: [(&str, OptionMap); N]) -> BTreeMap<String, OptionMap> {
        entries
            .into_iter()
            .map(|(source, options)| (source.to_string(), options))
            .collect()
    }

    fn render(named: &BTreeMap<String, OptionMap>) -> String {
        let mut doc = DslDocument::new();
        OptionConverter::new().apply(named, &mut doc).unwrap();
        doc.render()
    }

    #[test]
    fn entity_options_list_sorted_sources() {
        let named = sets([
            ("Book", opts([("dto", "mapstruct".into())])),
            ("Author", opts([("dto", "mapstruct".into()), ("readOnly", true.into())])),
        ]);

        assert_eq!(render(&named), "readOnly Author\ndto Author, Book with mapstruct\n");
    }

    #[test]
    fn global_and_wildcard_sources_target_all() {
        let named = sets([
            ("*", opts([("skipClient", true.into()), ("pagination", "infinite-scroll".into())])),
            ("Book", opts([("pagination", "infinite-scroll".into())])),
        ]);

        assert_eq!(
            render(&named),
            "skipClient *\npagination * with infinite-scroll\n"
        );
    }

    #[test]
    fn wildcard_excludes_entity_holding_the_default() {
        let named = sets([
            ("*", opts([("dto", "mapstruct".into())])),
            ("Book", opts([("dto", "no".into())])),
            ("Author", opts([("dto", "mapstruct".into())])),
        ]);

        assert_eq!(render(&named), "dto * with mapstruct except Book\n");
    }

    #[test]
    fn wildcard_comes_first_and_excludes_overrides() {
        let named = sets([
            ("*", opts([("pagination", "pagination".into())])),
            ("Book", opts([("pagination", "infinite-scroll".into())])),
        ]);

        assert_eq!(
            render(&named),
            "pagination * with pagination except Book\npagination Book with infinite-scroll\n"
        );
    }

    #[test]
    fn wildcard_flag_excludes_unset_entities() {
        let named = sets([
            ("*", opts([("readOnly", true.into())])),
            ("Audit", opts([("readOnly", true.into())])),
            ("Draft", opts([("readOnly", false.into())])),
        ]);

        assert_eq!(render(&named), "readOnly * except Draft\n");
    }

    #[test]
    fn default_wildcard_leaves_entity_values_alone() {
        let named = sets([
            ("*", opts([("search", "no".into())])),
            ("Book", opts([("search", "elasticsearch".into())])),
        ]);

        assert_eq!(render(&named), "search Book with elasticsearch\n");
    }

    #[test]
    fn defaults_and_unknown_keys_emit_nothing() {
        let named = sets([(
            "*",
            opts([
                ("dto", "no".into()),
                ("readOnly", false.into()),
                ("angularSuffix", "".into()),
                ("baseName", "store".into()),
                ("colour", "blue".into()),
            ]),
        )]);

        assert_eq!(render(&named), "");
    }

    #[test]
    fn distinct_values_get_separate_declarations() {
        let named = sets([
            ("A", opts([("service", "serviceClass".into())])),
            ("B", opts([("service", "serviceImpl".into())])),
        ]);

        assert_eq!(
            render(&named),
            "service A with serviceClass\nservice B with serviceImpl\n"
        );
    }

    #[test]
    fn invalid_value_is_rejected_before_anything_is_appended() {
        let named = sets([
            ("A", opts([("readOnly", true.into())])),
            ("B", opts([("dto", "graphql".into())])),
        ]);
        let mut doc = DslDocument::new();

        let err = OptionConverter::new().apply(&named, &mut doc).unwrap_err();

        assert!(matches!(err, DomainError::InvalidOptionValue { ref option, .. } if option == "dto"));
        assert!(doc.is_empty());
    }

    #[test]
    fn flag_rejects_non_boolean() {
        let named = sets([("A", opts([("embedded", OptionValue::Number(3))]))]);
        let mut doc = DslDocument::new();
        assert!(OptionConverter::new().apply(&named, &mut doc).is_err());
    }

    #[test]
    fn output_is_independent_of_insertion_order() {
        let mut first = OptionMap::new();
        first.insert("search".into(), "elasticsearch".into());
        first.insert("filter".into(), true.into());

        let mut second = OptionMap::new();
        second.insert("filter".into(), true.into());
        second.insert("search".into(), "elasticsearch".into());

        let a = render(&BTreeMap::from([("Book".to_string(), first)]));
        let b = render(&BTreeMap::from([("Book".to_string(), second)]));
        assert_eq!(a, b);
        assert_eq!(a, "filter Book\nsearch Book with elasticsearch\n");
    }

    #[test]
    fn catalog_keys_are_unique() {
        let keys: BTreeSet<_> = option_catalog().iter().map(|s| s.key).collect();
        assert_eq!(keys.len(), option_catalog().len());
    }
}
