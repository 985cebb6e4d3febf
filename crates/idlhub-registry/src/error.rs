//! Error types for the repository client.

/// Client-side transfer errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Push invoked with no provides declared.
    #[error("nothing to push")]
    NothingToPush,

    /// Pull invoked with no dependencies declared.
    #[error("nothing to pull")]
    NothingToPull,

    /// Upload did not come back 201 Created.
    #[error("upload failed with status {status}")]
    UploadFailed { status: u16 },

    /// A non-success status on any other request, surfaced verbatim.
    #[error("status code {status} is not OK")]
    Status { status: u16 },

    /// Network failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// The repository answered with something unparseable.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Local filesystem failure around the transfer.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] idlhub_core::config::ConfigError),

    #[error(transparent)]
    Ignore(#[from] idlhub_core::ignore::IgnoreError),

    #[error(transparent)]
    Archive(#[from] idlhub_core::ArchiveError),
}

impl ClientError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
