//! The pull operation: download every declared dependency and unpack it.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use idlhub_core::archive::unpack_tree;
use idlhub_core::config::Configuration;

use crate::client::RepositoryClient;
use crate::error::{ClientError, ClientResult};

pub struct PullOptions<'a> {
    pub configuration: &'a Configuration,
}

/// Download each dependency's payload from its resolved repository and
/// unpack it into `{idl_directory}/{name}/{type}`, replacing whatever a
/// previous pull left there.
///
/// Stops at the first failure; dependencies unpacked before the failure
/// stay in place.
pub async fn pull(options: PullOptions<'_>) -> ClientResult<()> {
    let configuration = options.configuration;
    if configuration.dependencies.is_empty() {
        return Err(ClientError::NothingToPull);
    }
    configuration.validate()?;

    for dependency in &configuration.dependencies {
        let repository = configuration.resolve_repository(dependency);
        let client = RepositoryClient::new(repository)?;

        let mut response = client
            .download_version(&dependency.name, &dependency.idl_type, &dependency.version)
            .await?;

        // Stage the payload in a temporary file, chunk by chunk, so the
        // unpacker gets a seekable stream without buffering the whole
        // archive in memory.
        let mut archive = NamedTempFile::new()
            .map_err(|e| ClientError::io("failed creating temporary archive", e))?;
        while let Some(chunk) = response.chunk().await? {
            archive
                .write_all(&chunk)
                .map_err(|e| ClientError::io("failed staging downloaded archive", e))?;
        }
        archive
            .flush()
            .map_err(|e| ClientError::io("failed staging downloaded archive", e))?;

        let reader = archive
            .reopen()
            .map_err(|e| ClientError::io("failed reopening staged archive", e))?;

        let destination = Path::new(&configuration.idl_directory)
            .join(&dependency.name)
            .join(&dependency.idl_type);
        unpack_tree(reader, &destination)?;

        info!(
            name = %dependency.name,
            idl_type = %dependency.idl_type,
            version = %dependency.version,
            destination = %destination.display(),
            "pulled dependency"
        );
    }
    Ok(())
}
