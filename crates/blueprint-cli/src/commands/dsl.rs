//! `blueprint dsl`: print application configurations as DSL text.

use serde_json::json;
use tracing::{info, instrument};

use blueprint_core::application::DslService;

use crate::{
    cli::{DslArgs, OutputFormat},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Convert every application in the input and print the documents.
///
/// Human output puts a `// <baseName>` header above each document; plain
/// output is the bare DSL, documents separated by a blank line.
#[instrument(skip_all, fields(input = %args.input.display()))]
pub fn execute(args: DslArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let apps = super::load_applications(&args.input)?;

    let mut service = DslService::new()
        .skip_user_management(args.skip_user_management || config.defaults.skip_user_management);
    if let Some(topology) = super::deployment_topology(args.deployment.as_deref(), &config)? {
        service = service.with_deployment(topology);
    }

    let documents = service.to_dsl_all(&apps)?;
    info!(documents = documents.len(), "DSL generated");

    if output.format() == OutputFormat::Json {
        let rendered: Vec<_> = documents
            .iter()
            .map(|(name, document)| json!({ "baseName": name, "dsl": document.render() }))
            .collect();
        output.emit_json(&rendered)?;
        return Ok(());
    }

    for (index, (name, document)) in documents.iter().enumerate() {
        if index > 0 {
            output.emit("\n")?;
        }
        if output.format() == OutputFormat::Human {
            output.header(&format!("// {name}"))?;
        }
        output.emit(&document.render())?;
    }

    Ok(())
}
