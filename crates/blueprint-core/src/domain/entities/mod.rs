pub mod application;
pub mod communication;
pub mod dsl;
pub mod entity;
pub mod workspace;

pub use application::{ApplicationConfig, OptionMap, OptionValue};
pub use communication::{CommunicationDescriptor, CommunicationLink, CommunicationSet};
pub use dsl::DslDocument;
pub use entity::{EntityDefinition, EntityMap, FieldDefinition, RelationshipDefinition, Validation};
pub use workspace::{BaseName, WorkspaceLayout};
