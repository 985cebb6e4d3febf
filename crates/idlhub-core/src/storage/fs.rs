//! Filesystem-backed storage.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

use crate::error::StorageError;
use crate::storage::Storage;

/// Storage rooted at a base directory on the local filesystem.
///
/// The base is created if missing and canonicalized once at construction;
/// every operation resolves its path against it lexically and rejects any
/// resolution that would land outside.
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    /// Create the base directory if needed and canonicalize it.
    pub fn new(base: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base = base.as_ref();
        std::fs::create_dir_all(base)
            .map_err(|e| StorageError::io("failed creating storage root", e))?;
        let base = base
            .canonicalize()
            .map_err(|e| StorageError::io("failed resolving storage root", e))?;
        debug!(base = %base.display(), "opened file storage");
        Ok(Self { base })
    }

    /// Resolve a storage path against the base directory.
    ///
    /// Resolution is lexical so it also covers paths that do not exist yet:
    /// normal components are pushed, `.` is skipped, `..` pops. The moment
    /// the resolved path stops being a descendant of (or equal to) the base
    /// the path is rejected, before any filesystem access.
    fn secure_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let escape = || StorageError::PathEscape {
            path: path.to_string(),
        };

        let relative = path.trim_start_matches('/');
        let mut resolved = self.base.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() || !resolved.starts_with(&self.base) {
                        return Err(escape());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(escape()),
            }
        }

        if resolved.starts_with(&self.base) {
            Ok(resolved)
        } else {
            Err(escape())
        }
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn exists(&self, path: &str) -> bool {
        match self.secure_path(path) {
            Ok(full) => fs::metadata(full).await.is_ok(),
            Err(_) => false,
        }
    }

    async fn list_folders(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let full = self.secure_path(path)?;

        let metadata = match fs::metadata(&full).await {
            Ok(metadata) => metadata,
            Err(_) => return Ok(Vec::new()),
        };
        if !metadata.is_dir() {
            return Err(StorageError::NotADirectory {
                path: path.to_string(),
            });
        }

        let mut entries = fs::read_dir(&full)
            .await
            .map_err(|e| StorageError::io("failed to read directory", e))?;

        let mut folders = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io("failed to read directory entry", e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StorageError::io("failed to stat directory entry", e))?;
            if file_type.is_dir() {
                folders.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        folders.sort();
        Ok(folders)
    }

    async fn mkdir(&self, path: &str) -> Result<(), StorageError> {
        let full = self.secure_path(path)?;
        fs::create_dir_all(&full)
            .await
            .map_err(|e| StorageError::io("failed creating directory", e))
    }

    async fn create_file(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(), StorageError> {
        let full = self.secure_path(path)?;
        let mut file = fs::File::create(&full)
            .await
            .map_err(|e| StorageError::io("failed creating file", e))?;

        // copy uses a fixed-size intermediate buffer, so memory use stays
        // independent of the payload size.
        tokio::io::copy(reader, &mut file)
            .await
            .map_err(|e| StorageError::io("failed writing stream to file", e))?;
        file.flush()
            .await
            .map_err(|e| StorageError::io("failed flushing file", e))?;
        Ok(())
    }

    async fn read_file(
        &self,
        path: &str,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError> {
        let full = self.secure_path(path)?;

        if fs::metadata(&full).await.is_err() {
            return Err(StorageError::NotFound {
                path: path.to_string(),
            });
        }

        let file = fs::File::open(&full)
            .await
            .map_err(|e| StorageError::io("failed to open file", e))?;
        Ok(Box::new(file))
    }
}
