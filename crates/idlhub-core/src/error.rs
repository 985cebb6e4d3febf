//! Error types for storage and catalog operations.

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The target does not exist.
    #[error("'{path}' does not exist")]
    NotFound { path: String },

    /// The resolved path would leave the storage root. Always fatal to the
    /// calling request, never retried.
    #[error("path '{path}' escapes the storage root")]
    PathEscape { path: String },

    /// A listing target exists but is not a directory.
    #[error("'{path}' is not a directory")]
    NotADirectory { path: String },

    /// Filesystem failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Catalog errors, layered on top of [`StorageError`].
///
/// The three not-found variants carry the exact messages the HTTP surface
/// returns with a 404, so "project was never created" is distinguishable
/// from "project has no types" at every catalog level.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("project '{project}' does not exist")]
    ProjectNotFound { project: String },

    #[error("project '{project}' does not have type '{idl_type}'")]
    TypeNotFound { project: String, idl_type: String },

    #[error("project '{project}' with type '{idl_type}' does not have version '{version}'")]
    VersionNotFound {
        project: String,
        idl_type: String,
        version: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl CatalogError {
    /// Whether this error names a missing project, type, or version.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProjectNotFound { .. }
                | Self::TypeNotFound { .. }
                | Self::VersionNotFound { .. }
                | Self::Storage(StorageError::NotFound { .. })
        )
    }
}
