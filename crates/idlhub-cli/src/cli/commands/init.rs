use std::path::Path;

use anyhow::Context;

use idlhub_core::config::Configuration;

use crate::cli::args::InitArgs;
use crate::exit_codes::EXIT_SUCCESS;

/// Write a fresh configuration with the project name and repository set;
/// dependencies and provides start empty.
pub fn run(config_path: &Path, args: InitArgs) -> anyhow::Result<i32> {
    let configuration = Configuration {
        name: args.name,
        repository: args.repository,
        ..Configuration::default()
    };

    configuration
        .save(config_path)
        .context("failed writing configuration")?;
    println!("wrote {}", config_path.display());
    Ok(EXIT_SUCCESS)
}
