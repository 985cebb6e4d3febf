use std::path::Path;

use anyhow::Context;

use idlhub_core::config::Configuration;
use idlhub_core::version::Version;
use idlhub_registry::PushOptions;

use crate::cli::args::PushArgs;
use crate::exit_codes::EXIT_SUCCESS;

/// Validate the version argument, load the configuration, and push every
/// declared provide. Both checks happen before any network activity.
pub async fn run(config_path: &Path, args: PushArgs) -> anyhow::Result<i32> {
    let version: Version = args.version.parse().context("invalid version")?;
    let configuration = Configuration::load(config_path)?;

    idlhub_registry::push(PushOptions {
        configuration: &configuration,
        version: &version,
    })
    .await?;
    Ok(EXIT_SUCCESS)
}
