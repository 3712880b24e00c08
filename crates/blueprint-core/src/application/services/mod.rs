//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "print an app as DSL" or "export a workspace".

pub mod dsl_service;
pub mod export_service;

pub use dsl_service::{DslService, SKIP_USER_MANAGEMENT};
pub use export_service::{
    COMMUNICATION_FILE, CONFIG_FILE, GENERATOR_KEY, SINGLE_APP_FILE, WorkspaceExporter,
    render_config,
};
