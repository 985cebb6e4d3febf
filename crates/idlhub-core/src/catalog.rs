//! Catalog operations over a [`Storage`].
//!
//! The read side is tiered: each address component is existence-checked
//! before descending so a missing project, type, or version yields its own
//! [`CatalogError`] instead of an empty listing. The top-level project
//! catalog is the exception — an empty repository lists as an empty
//! sequence, never as an error.

use tokio::io::AsyncRead;
use tracing::debug;

use crate::error::CatalogError;
use crate::layout;
use crate::storage::Storage;

/// List all project names. Never a not-found condition.
pub async fn list_projects(storage: &dyn Storage) -> Result<Vec<String>, CatalogError> {
    Ok(storage.list_folders(layout::CATALOG_ROOT).await?)
}

/// List the types a project offers.
pub async fn list_types(
    storage: &dyn Storage,
    project: &str,
) -> Result<Vec<String>, CatalogError> {
    let path = layout::project_path(project);
    if !storage.exists(&path).await {
        return Err(CatalogError::ProjectNotFound {
            project: project.to_string(),
        });
    }
    Ok(storage.list_folders(&path).await?)
}

/// List the versions stored for a project's type.
pub async fn list_versions(
    storage: &dyn Storage,
    project: &str,
    idl_type: &str,
) -> Result<Vec<String>, CatalogError> {
    if !storage.exists(&layout::project_path(project)).await {
        return Err(CatalogError::ProjectNotFound {
            project: project.to_string(),
        });
    }

    let path = layout::type_path(project, idl_type);
    if !storage.exists(&path).await {
        return Err(CatalogError::TypeNotFound {
            project: project.to_string(),
            idl_type: idl_type.to_string(),
        });
    }
    Ok(storage.list_folders(&path).await?)
}

/// Write a version's payload, creating its directory first.
///
/// No existing-version check is made: pushing the same address again
/// overwrites the previous payload, last write wins.
pub async fn store_payload(
    storage: &dyn Storage,
    project: &str,
    idl_type: &str,
    version: &str,
    reader: &mut (dyn AsyncRead + Send + Unpin),
) -> Result<(), CatalogError> {
    storage
        .mkdir(&layout::version_path(project, idl_type, version))
        .await?;
    storage
        .create_file(&layout::payload_path(project, idl_type, version), reader)
        .await?;
    debug!(project, idl_type, version, "stored payload");
    Ok(())
}

/// Open a version's payload for reading, checking project, then type, then
/// version existence so each missing component reports distinctly.
pub async fn open_payload(
    storage: &dyn Storage,
    project: &str,
    idl_type: &str,
    version: &str,
) -> Result<Box<dyn AsyncRead + Send + Unpin>, CatalogError> {
    if !storage.exists(&layout::project_path(project)).await {
        return Err(CatalogError::ProjectNotFound {
            project: project.to_string(),
        });
    }
    if !storage.exists(&layout::type_path(project, idl_type)).await {
        return Err(CatalogError::TypeNotFound {
            project: project.to_string(),
            idl_type: idl_type.to_string(),
        });
    }
    if !storage
        .exists(&layout::version_path(project, idl_type, version))
        .await
    {
        return Err(CatalogError::VersionNotFound {
            project: project.to_string(),
            idl_type: idl_type.to_string(),
            version: version.to_string(),
        });
    }

    Ok(storage
        .read_file(&layout::payload_path(project, idl_type, version))
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use tokio::io::AsyncReadExt;

    async fn push(storage: &MemoryStorage, project: &str, idl_type: &str, version: &str) {
        let mut bytes: &[u8] = b"payload";
        store_payload(storage, project, idl_type, version, &mut bytes)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_catalog_lists_empty_not_error() {
        let storage = MemoryStorage::new();
        assert!(list_projects(&storage).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_project_is_not_found_not_empty() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            list_types(&storage, "ghost").await,
            Err(CatalogError::ProjectNotFound { .. })
        ));
        assert!(matches!(
            list_versions(&storage, "ghost", "protobuf").await,
            Err(CatalogError::ProjectNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn missing_type_reports_distinctly() {
        let storage = MemoryStorage::new();
        push(&storage, "acme", "protobuf", "1.2.3").await;

        let err = list_versions(&storage, "acme", "avro").await.unwrap_err();
        assert!(matches!(err, CatalogError::TypeNotFound { .. }));
        assert_eq!(err.to_string(), "project 'acme' does not have type 'avro'");
    }

    #[tokio::test]
    async fn store_then_list_and_open() {
        let storage = MemoryStorage::new();
        push(&storage, "acme", "protobuf", "1.2.3").await;

        assert_eq!(list_projects(&storage).await.unwrap(), vec!["acme"]);
        assert_eq!(list_types(&storage, "acme").await.unwrap(), vec!["protobuf"]);
        assert_eq!(
            list_versions(&storage, "acme", "protobuf").await.unwrap(),
            vec!["1.2.3"]
        );

        let mut reader = open_payload(&storage, "acme", "protobuf", "1.2.3")
            .await
            .unwrap();
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).await.unwrap();
        assert_eq!(contents, b"payload");
    }

    #[tokio::test]
    async fn repush_overwrites() {
        let storage = MemoryStorage::new();
        push(&storage, "acme", "protobuf", "1.2.3").await;

        let mut second: &[u8] = b"second payload";
        store_payload(&storage, "acme", "protobuf", "1.2.3", &mut second)
            .await
            .unwrap();

        let mut reader = open_payload(&storage, "acme", "protobuf", "1.2.3")
            .await
            .unwrap();
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).await.unwrap();
        assert_eq!(contents, b"second payload");
    }

    #[tokio::test]
    async fn open_payload_reports_each_missing_tier() {
        let storage = MemoryStorage::new();
        push(&storage, "acme", "protobuf", "1.2.3").await;

        let err = open_payload(&storage, "nope", "protobuf", "1.2.3")
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "project 'nope' does not exist");

        let err = open_payload(&storage, "acme", "avro", "1.2.3")
            .await
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "project 'acme' does not have type 'avro'");

        let err = open_payload(&storage, "acme", "protobuf", "9.9.9")
            .await
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "project 'acme' with type 'protobuf' does not have version '9.9.9'"
        );
    }
}
