//! The push operation: package every declared provide and upload it.

use std::path::Path;

use tracing::info;

use idlhub_core::archive::pack_to_temp;
use idlhub_core::config::Configuration;
use idlhub_core::ignore::IgnoreSpec;
use idlhub_core::version::Version;

use crate::client::RepositoryClient;
use crate::error::{ClientError, ClientResult};

pub struct PushOptions<'a> {
    pub configuration: &'a Configuration,
    pub version: &'a Version,
}

/// Package each provide root (filtered by its resolved ignore spec) into a
/// temporary archive and upload it under the configured project name.
///
/// Stops at the first failure; versions uploaded before the failure stay
/// in place.
pub async fn push(options: PushOptions<'_>) -> ClientResult<()> {
    let configuration = options.configuration;
    if configuration.provides.is_empty() {
        return Err(ClientError::NothingToPush);
    }
    configuration.validate()?;

    let client = RepositoryClient::new(&configuration.repository)?;
    let version = options.version.to_string();

    for provide in &configuration.provides {
        let ignore = IgnoreSpec::resolve(provide.idlignore.as_deref())?;
        let archive = pack_to_temp(Path::new(&provide.root), &ignore)?;

        let file = tokio::fs::File::open(archive.path())
            .await
            .map_err(|e| ClientError::io("failed opening packaged archive", e))?;

        client
            .upload_version(&configuration.name, &provide.idl_type, &version, file)
            .await?;

        info!(
            project = %configuration.name,
            idl_type = %provide.idl_type,
            version = %version,
            root = %provide.root,
            "pushed provide"
        );
    }
    Ok(())
}
