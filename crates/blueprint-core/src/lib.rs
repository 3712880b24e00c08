//! Blueprint Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for Blueprint: the
//! application configuration model, its conversion into DSL text, the
//! deployment option catalogs, and the multi-application workspace export.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          blueprint-cli (CLI)            │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │    (DslService, WorkspaceExporter)      │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │          (Driven: Filesystem)           │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    blueprint-adapters (Infrastructure)  │
//! │  (LocalFilesystem, MemoryFilesystem)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (ApplicationConfig, converters, catalogs)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use blueprint_core::{
//!     application::DslService,
//!     domain::{ApplicationConfig, EntityDefinition, FieldDefinition},
//! };
//!
//! let app = ApplicationConfig::new("store")
//!     .with_entity("Book", EntityDefinition::new().with_field(FieldDefinition::new("title", "String")));
//!
//! let document = DslService::new().to_dsl(&app).unwrap();
//! println!("{document}");
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{DslService, WorkspaceExporter, ports::Filesystem};
    pub use crate::domain::{
        ApplicationConfig, CommunicationSet, ConversionOptions, DeploymentOptions,
        DeploymentTopology, DslDocument, EntityConverter, EntityDefinition, EntityMap,
        OptionConverter, OptionMap, OptionValue, WorkspaceLayout,
    };
    pub use crate::error::{BlueprintError, BlueprintResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
