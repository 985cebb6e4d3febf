use std::path::Path;

use idlhub_core::config::Configuration;
use idlhub_registry::PullOptions;

use crate::exit_codes::EXIT_SUCCESS;

/// Load the configuration and pull every declared dependency.
pub async fn run(config_path: &Path) -> anyhow::Result<i32> {
    let configuration = Configuration::load(config_path)?;

    idlhub_registry::pull(PullOptions {
        configuration: &configuration,
    })
    .await?;
    Ok(EXIT_SUCCESS)
}
