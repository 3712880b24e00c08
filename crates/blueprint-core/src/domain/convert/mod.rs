//! Model → DSL converters.

pub mod entity_converter;
pub mod option_converter;

pub use entity_converter::{BUILT_IN_ENTITY_OPTION, BUILT_IN_USER, ConversionOptions, EntityConverter};
pub use option_converter::{OptionConverter, OptionKind, OptionScope, OptionSpec, option_catalog};
