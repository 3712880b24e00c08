//! `blueprint export`: write applications into a workspace directory.

use std::path::PathBuf;

use serde_json::json;
use tracing::{info, instrument, warn};

use blueprint_adapters::{ConfigLoader, LocalFilesystem};
use blueprint_core::{
    application::WorkspaceExporter,
    domain::{CommunicationSet, DeploymentOptionsResolver},
};

use crate::{
    cli::{ExportArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Export the input's applications under `--output` (default: CWD).
///
/// The output directory is created if missing; application directories
/// inside it are never overwritten.
#[instrument(skip_all, fields(input = %args.input.display()))]
pub fn execute(args: ExportArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let mut apps = super::load_applications(&args.input)?;

    if let Some(topology) = super::deployment_topology(args.deployment.as_deref(), &config)? {
        let fragment = DeploymentOptionsResolver::defaults(topology).fragment();
        for app in &mut apps {
            app.merge_defaults(&fragment);
        }
        info!(%topology, "Deployment defaults merged");
    }

    let root = args.output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&root).with_cli_context(|| {
        format!("Failed to create output directory '{}'", root.display())
    })?;
    let exporter = WorkspaceExporter::new(Box::new(LocalFilesystem::new()), &root);

    if args.single {
        let [app] = apps.as_slice() else {
            return Err(CliError::InvalidInput {
                message: format!(
                    "--single expects exactly one application, found {}",
                    apps.len()
                ),
            });
        };
        if args.communications.is_some() {
            output.warning("--communications is ignored with --single")?;
        }

        let path = exporter.export_application(app)?;
        if output.format() == OutputFormat::Json {
            output.emit_json(&json!({ "file": path }))?;
        } else {
            output.success(&format!("Exported '{}' to {}", app.base_name, path.display()))?;
        }
        return Ok(());
    }

    let communications = match &args.communications {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::InputNotFound { path: path.clone() });
            }
            ConfigLoader::new().load_communications(path)?
        }
        None => CommunicationSet::default(),
    };
    for link in &communications.communications {
        let known = apps
            .iter()
            .any(|app| app.base_name == link.client || app.base_name == link.server);
        if !known {
            warn!(client = %link.client, server = %link.server, "Link matches no exported application");
        }
    }

    let layout = exporter.export_applications(&apps, &communications)?;

    if output.format() == OutputFormat::Json {
        output.emit_json(&json!({
            "root": layout.root(),
            "applications": layout.names(),
        }))?;
        return Ok(());
    }

    output.success(&format!(
        "Exported {} application(s) to {}",
        layout.len(),
        layout.root().display()
    ))?;
    for dir in layout.directories() {
        output.info(&format!("  {}", dir.display()))?;
    }

    Ok(())
}
