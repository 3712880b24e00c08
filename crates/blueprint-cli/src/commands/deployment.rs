//! `blueprint deployment`: print a topology's default options as JSON.

use tracing::instrument;

use blueprint_core::{domain::DeploymentOptionsResolver, error::BlueprintError};

use crate::{cli::DeploymentArgs, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(tag = %args.tag, strict = args.strict))]
pub fn execute(args: DeploymentArgs, output: OutputManager) -> CliResult<()> {
    let topology = match DeploymentOptionsResolver::parse_tag(&args.tag) {
        Ok(topology) => topology,
        Err(err) if args.strict => return Err(BlueprintError::from(err).into()),
        Err(_) => {
            let fallback = DeploymentOptionsResolver::resolve_tag(&args.tag);
            output.warning(&format!(
                "Unknown deployment '{}', using {fallback} defaults",
                args.tag
            ))?;
            fallback
        }
    };

    let options = if args.full {
        DeploymentOptionsResolver::config(topology).to_option_map()
    } else {
        DeploymentOptionsResolver::defaults(topology).fragment()
    };

    output.emit_json(&options)?;
    Ok(())
}
