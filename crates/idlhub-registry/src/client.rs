//! HTTP client for the repository API.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::StatusCode;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// User agent for repository requests.
const USER_AGENT_VALUE: &str = concat!("idlhub/", env!("CARGO_PKG_VERSION"));

/// Client for one repository base URL.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RepositoryClient {
    /// Create a client. The base URL is normalized (no trailing slash).
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| ClientError::Network {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List all project names.
    pub async fn list_projects(&self) -> ClientResult<Vec<String>> {
        self.list(format!("{}/v1/projects", self.base_url)).await
    }

    /// List the types a project offers.
    pub async fn list_types(&self, project: &str) -> ClientResult<Vec<String>> {
        self.list(format!("{}/v1/projects/{project}/types", self.base_url))
            .await
    }

    /// List the versions stored for a project's type.
    pub async fn list_versions(&self, project: &str, idl_type: &str) -> ClientResult<Vec<String>> {
        self.list(format!(
            "{}/v1/projects/{project}/types/{idl_type}/versions",
            self.base_url
        ))
        .await
    }

    async fn list(&self, url: String) -> ClientResult<Vec<String>> {
        debug!(url = %url, "listing catalog level");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse {
                message: format!("failed to parse listing: {e}"),
            })
    }

    /// Upload an archive as a new version. Streams the file; anything but
    /// 201 Created is an upload failure.
    pub async fn upload_version(
        &self,
        project: &str,
        idl_type: &str,
        version: &str,
        archive: tokio::fs::File,
    ) -> ClientResult<()> {
        let url = format!(
            "{}/v1/projects/{project}/types/{idl_type}/versions/{version}",
            self.base_url
        );
        debug!(url = %url, "uploading version");

        let body = reqwest::Body::wrap_stream(ReaderStream::new(archive));
        let response = self.client.post(&url).body(body).send().await?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(ClientError::UploadFailed {
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// Fetch a version's payload. Returns the response for streamed
    /// consumption; anything but 200 OK is surfaced with its status code.
    pub async fn download_version(
        &self,
        project: &str,
        idl_type: &str,
        version: &str,
    ) -> ClientResult<reqwest::Response> {
        let url = format!(
            "{}/v1/projects/{project}/types/{idl_type}/versions/{version}/data.tar.gz",
            self.base_url
        );
        debug!(url = %url, "downloading version");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}
