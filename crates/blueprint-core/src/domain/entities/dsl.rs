//! The DSL document: an ordered sequence of statements and its text form.
//!
//! Rendering is a pure function of the statement list, so structurally
//! identical documents always render to byte-identical text.

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use crate::domain::entities::entity::{EntityDefinition, FieldDefinition, Validation};
use crate::domain::value_objects::RelationshipKind;

/// Target list meaning "every entity".
pub const ALL_TARGETS: &str = "*";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DslDocument {
    statements: Vec<Statement>,
}

impl DslDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Entity(e) => Some(e),
            _ => None,
        })
    }

    pub fn relationships(&self) -> impl Iterator<Item = &RelationshipDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Relationship(r) => Some(r),
            _ => None,
        })
    }

    pub fn options(&self) -> impl Iterator<Item = &OptionDeclaration> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Option(o) => Some(o),
            _ => None,
        })
    }

    /// Render the document as DSL text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Extend<Statement> for DslDocument {
    fn extend<I: IntoIterator<Item = Statement>>(&mut self, iter: I) {
        self.statements.extend(iter);
    }
}

impl fmt::Display for DslDocument {
    /// Blocks are separated by one blank line; consecutive option lines are
    /// kept together.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous: Option<&Statement> = None;
        for statement in &self.statements {
            if let Some(prev) = previous {
                let both_options =
                    matches!(prev, Statement::Option(_)) && matches!(statement, Statement::Option(_));
                if !both_options {
                    f.write_char('\n')?;
                }
            }
            writeln!(f, "{statement}")?;
            previous = Some(statement);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Entity(EntityDeclaration),
    Relationship(RelationshipDeclaration),
    Option(OptionDeclaration),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(e) => e.fmt(f),
            Self::Relationship(r) => r.fmt(f),
            Self::Option(o) => o.fmt(f),
        }
    }
}

// ── Entity declarations ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDeclaration {
    pub name: String,
    pub table_name: Option<String>,
    pub javadoc: Option<String>,
    pub fields: Vec<FieldDeclaration>,
}

impl EntityDeclaration {
    pub fn from_definition(name: &str, definition: &EntityDefinition) -> Self {
        Self {
            name: name.to_string(),
            table_name: definition.table_name.clone(),
            javadoc: definition.javadoc.clone(),
            fields: definition
                .fields
                .iter()
                .map(FieldDeclaration::from_definition)
                .collect(),
        }
    }
}

impl fmt::Display for EntityDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(doc) = &self.javadoc {
            write_javadoc(f, doc, "")?;
        }
        write!(f, "entity {}", self.name)?;
        if let Some(table) = &self.table_name {
            write!(f, "({table})")?;
        }
        if self.fields.is_empty() {
            return Ok(());
        }
        f.write_str(" {\n")?;
        for field in &self.fields {
            if let Some(doc) = &field.javadoc {
                write_javadoc(f, doc, "  ")?;
            }
            write!(f, "  {} {}", field.name, field.field_type)?;
            for validation in &field.validations {
                write!(f, " {validation}")?;
            }
            f.write_char('\n')?;
        }
        f.write_char('}')
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    pub field_type: String,
    pub validations: Vec<Validation>,
    pub javadoc: Option<String>,
}

impl FieldDeclaration {
    pub fn from_definition(field: &FieldDefinition) -> Self {
        Self {
            name: field.name.clone(),
            field_type: field.field_type.clone(),
            validations: field.validations.clone(),
            javadoc: field.javadoc.clone(),
        }
    }
}

fn write_javadoc(f: &mut fmt::Formatter<'_>, doc: &str, indent: &str) -> fmt::Result {
    writeln!(f, "{indent}/**")?;
    for line in doc.lines() {
        if line.is_empty() {
            writeln!(f, "{indent} *")?;
        } else {
            // a literal `*/` would close the comment
            writeln!(f, "{indent} * {}", line.replace("*/", "*\\/"))?;
        }
    }
    writeln!(f, "{indent} */")
}

// ── Relationship declarations ─────────────────────────────────────────────────

/// One logical relationship, written from its owning side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDeclaration {
    pub kind: RelationshipKind,
    pub from: RelationshipEnd,
    pub to: RelationshipEnd,
    /// Options rendered after `with`, e.g. `builtInEntity`.
    pub options: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEnd {
    pub entity: String,
    pub field: Option<String>,
    pub display_field: Option<String>,
    pub required: bool,
}

impl fmt::Display for RelationshipEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entity)?;
        let Some(field) = &self.field else {
            return Ok(());
        };
        write!(f, "{{{field}")?;
        if let Some(display) = &self.display_field {
            write!(f, "({display})")?;
        }
        if self.required {
            f.write_str(" required")?;
        }
        f.write_char('}')
    }
}

impl fmt::Display for RelationshipDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "relationship {} {{", self.kind.dsl_keyword())?;
        write!(f, "  {} to {}", self.from, self.to)?;
        if !self.options.is_empty() {
            let options: Vec<&str> = self.options.iter().map(String::as_str).collect();
            write!(f, " with {}", options.join(", "))?;
        }
        f.write_str("\n}")
    }
}

// ── Option declarations ───────────────────────────────────────────────────────

/// Entities an option declaration applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionTargets {
    All,
    Entities(Vec<String>),
}

impl fmt::Display for OptionTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_TARGETS),
            Self::Entities(names) => f.write_str(&names.join(", ")),
        }
    }
}

/// `<option> <targets> [with <value>] [except <entities>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDeclaration {
    pub option: &'static str,
    /// `None` for unary (flag) options.
    pub value: Option<String>,
    pub targets: OptionTargets,
    /// Entities left out of an [`OptionTargets::All`] declaration.
    pub excluded: Vec<String>,
}

impl OptionDeclaration {
    pub fn new(option: &'static str, value: Option<String>, targets: OptionTargets) -> Self {
        Self {
            option,
            value,
            targets,
            excluded: Vec::new(),
        }
    }

    pub fn except(mut self, excluded: Vec<String>) -> Self {
        self.excluded = excluded;
        self
    }
}

impl fmt::Display for OptionDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.option, self.targets)?;
        if let Some(value) = &self.value {
            write!(f, " with {value}")?;
        }
        if !self.excluded.is_empty() {
            write!(f, " except {}", self.excluded.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_without_fields_renders_bare() {
        let decl = EntityDeclaration::from_definition("Tag", &EntityDefinition::new());
        assert_eq!(decl.to_string(), "entity Tag");
    }

    #[test]
    fn entity_renders_table_doc_and_validations() {
        let def = EntityDefinition::new()
            .with_table_name("books")
            .with_javadoc("A book.")
            .with_field(
                FieldDefinition::new("title", "String")
                    .with_validation(Validation::Required)
                    .with_validation(Validation::MaxLength(100)),
            );
        let text = EntityDeclaration::from_definition("Book", &def).to_string();

        assert_eq!(
            text,
            "/**\n * A book.\n */\nentity Book(books) {\n  title String required maxlength(100)\n}"
        );
    }

    #[test]
    fn relationship_renders_ends_and_options() {
        let decl = RelationshipDeclaration {
            kind: RelationshipKind::ManyToOne,
            from: RelationshipEnd {
                entity: "Book".into(),
                field: Some("author".into()),
                display_field: Some("name".into()),
                required: true,
            },
            to: RelationshipEnd {
                entity: "Author".into(),
                field: Some("books".into()),
                display_field: None,
                required: false,
            },
            options: BTreeSet::from(["builtInEntity".to_string()]),
        };

        assert_eq!(
            decl.to_string(),
            "relationship ManyToOne {\n  Book{author(name) required} to Author{books} with builtInEntity\n}"
        );
    }

    #[test]
    fn option_lines_are_grouped() {
        let mut doc = DslDocument::new();
        doc.push(Statement::Entity(EntityDeclaration::from_definition(
            "A",
            &EntityDefinition::new(),
        )));
        doc.push(Statement::Option(OptionDeclaration::new(
            "dto",
            Some("mapstruct".into()),
            OptionTargets::All,
        )));
        doc.push(Statement::Option(OptionDeclaration::new(
            "readOnly",
            None,
            OptionTargets::Entities(vec!["A".into()]),
        )));

        assert_eq!(doc.render(), "entity A\n\ndto * with mapstruct\nreadOnly A\n");
    }

    #[test]
    fn wildcard_option_lists_exclusions() {
        let decl = OptionDeclaration::new("dto", Some("mapstruct".into()), OptionTargets::All)
            .except(vec!["Author".into(), "Book".into()]);

        assert_eq!(decl.to_string(), "dto * with mapstruct except Author, Book");
    }

    #[test]
    fn javadoc_cannot_close_its_comment_early() {
        let def = EntityDefinition::new().with_javadoc("Ends with */ here.");
        let text = EntityDeclaration::from_definition("Note", &def).to_string();

        assert_eq!(text, "/**\n * Ends with *\\/ here.\n */\nentity Note");
    }
}
