//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core calls and print results. Helpers
//! shared by several handlers live here.

pub mod completions;
pub mod config;
pub mod deployment;
pub mod dsl;
pub mod export;
pub mod init;

use std::path::Path;

use tracing::{debug, warn};

use blueprint_adapters::ConfigLoader;
use blueprint_core::{
    domain::{ApplicationConfig, DeploymentOptionsResolver, DeploymentTopology},
    error::BlueprintError,
};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

/// Load every application under `input`, failing with exit code 3 if absent.
pub(crate) fn load_applications(input: &Path) -> CliResult<Vec<ApplicationConfig>> {
    if !input.exists() {
        return Err(CliError::InputNotFound {
            path: input.to_path_buf(),
        });
    }
    let apps = ConfigLoader::new().load_applications(input)?;
    debug!(count = apps.len(), "Input loaded");
    Ok(apps)
}

/// Topology to merge, if any.
///
/// A flag value is parsed strictly; a value from configuration falls back to
/// dockerCompose when unknown.
pub(crate) fn deployment_topology(
    flag: Option<&str>,
    config: &AppConfig,
) -> CliResult<Option<DeploymentTopology>> {
    if let Some(tag) = flag {
        let topology = DeploymentOptionsResolver::parse_tag(tag).map_err(BlueprintError::from)?;
        return Ok(Some(topology));
    }

    Ok(config.defaults.deployment.as_deref().map(|tag| {
        let topology = DeploymentOptionsResolver::resolve_tag(tag);
        if DeploymentOptionsResolver::parse_tag(tag).is_err() {
            warn!(tag, fallback = %topology, "Unknown deployment in configuration");
        }
        topology
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_parsed_strictly() {
        let config = AppConfig::default();

        assert_eq!(
            deployment_topology(Some("kubernetes"), &config).unwrap(),
            Some(DeploymentTopology::Kubernetes)
        );
        let err = deployment_topology(Some("nomad"), &config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn config_value_falls_back() {
        let mut config = AppConfig::default();
        assert_eq!(deployment_topology(None, &config).unwrap(), None);

        config.defaults.deployment = Some("nomad".into());
        assert_eq!(
            deployment_topology(None, &config).unwrap(),
            Some(DeploymentTopology::DockerCompose)
        );
    }

    #[test]
    fn flag_wins_over_config() {
        let mut config = AppConfig::default();
        config.defaults.deployment = Some("openshift".into());

        assert_eq!(
            deployment_topology(Some("minikube"), &config).unwrap(),
            Some(DeploymentTopology::Minikube)
        );
    }

    #[test]
    fn missing_input_is_not_found() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = load_applications(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CliError::InputNotFound { .. }));
    }
}
