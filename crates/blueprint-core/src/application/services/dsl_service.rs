//! DSL Service - turns one application configuration into a DSL document.
//!
//! Workflow:
//! 1. Optionally merge deployment defaults into a copy of the config
//! 2. Convert the entity graph (entities, then relationships)
//! 3. Append option declarations for the app and each entity

use std::collections::BTreeMap;

use tracing::{debug, info, instrument};

use crate::{
    domain::{
        ApplicationConfig, ConversionOptions, DeploymentTopology, DslDocument, EntityConverter,
        OptionConverter, OptionMap, deployment::DeploymentOptionsResolver,
        entities::dsl::ALL_TARGETS,
    },
    error::BlueprintResult,
};

/// Application option that turns off the built-in user entity.
pub const SKIP_USER_MANAGEMENT: &str = "skipUserManagement";

/// Stateless driver for [`EntityConverter`] and [`OptionConverter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DslService {
    options: ConversionOptions,
    deployment: Option<DeploymentTopology>,
}

impl DslService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force `skipUserManagement` on, regardless of app options.
    pub fn skip_user_management(mut self, skip: bool) -> Self {
        self.options.skip_user_management = skip;
        self
    }

    /// Merge this topology's defaults into each app before converting.
    pub fn with_deployment(mut self, topology: DeploymentTopology) -> Self {
        self.deployment = Some(topology);
        self
    }

    /// Produce the DSL document for one application.
    #[instrument(skip_all, fields(app = %app.base_name))]
    pub fn to_dsl(&self, app: &ApplicationConfig) -> BlueprintResult<DslDocument> {
        let app = self.prepare(app);

        let options = self.conversion_options(&app);
        let mut document = EntityConverter::new(options).convert(&app.entities)?;
        debug!(statements = document.len(), "Entities converted");

        OptionConverter::new().apply(&named_option_sets(&app), &mut document)?;

        info!(
            entities = app.entities.len(),
            statements = document.len(),
            "DSL document built"
        );
        Ok(document)
    }

    /// Produce DSL documents for several applications, stopping at the first error.
    pub fn to_dsl_all(
        &self,
        apps: &[ApplicationConfig],
    ) -> BlueprintResult<Vec<(String, DslDocument)>> {
        apps.iter()
            .map(|app| Ok((app.base_name.clone(), self.to_dsl(app)?)))
            .collect()
    }

    /// The config as converted: a copy with deployment defaults merged in.
    pub fn prepare(&self, app: &ApplicationConfig) -> ApplicationConfig {
        let mut app = app.clone();
        if let Some(topology) = self.deployment {
            let added = app.merge_defaults(&DeploymentOptionsResolver::defaults(topology).fragment());
            debug!(%topology, added, "Deployment defaults merged");
        }
        app
    }

    fn conversion_options(&self, app: &ApplicationConfig) -> ConversionOptions {
        let from_app = app
            .option(SKIP_USER_MANAGEMENT)
            .and_then(|value| value.as_bool())
            .unwrap_or(false);

        self.options
            .skip_user_management(self.options.skip_user_management || from_app)
    }
}

/// `*` → app options, then every entity with options of its own.
fn named_option_sets(app: &ApplicationConfig) -> BTreeMap<String, OptionMap> {
    let mut named = BTreeMap::from([(ALL_TARGETS.to_string(), app.options.clone())]);
    named.extend(
        app.entities
            .iter()
            .filter(|(_, def)| !def.options.is_empty())
            .map(|(name, def)| (name.to_string(), def.options.clone())),
    );
    named
}
