//! In-memory storage, primarily for tests.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::storage::Storage;

#[derive(Default)]
struct Inner {
    /// Normalized directory paths ("" is the base itself).
    dirs: BTreeSet<String>,
    files: BTreeMap<String, Vec<u8>>,
}

/// A [`Storage`] over an in-memory tree with the same confinement and
/// missing-is-empty semantics as [`FileStorage`](crate::FileStorage).
///
/// Useful wherever a test wants catalog or transfer behavior without
/// touching the filesystem.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lexically normalize a storage path, rejecting escapes.
    fn normalize(path: &str) -> Result<String, StorageError> {
        let mut parts: Vec<&str> = Vec::new();
        for part in path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if parts.pop().is_none() {
                        return Err(StorageError::PathEscape {
                            path: path.to_string(),
                        });
                    }
                }
                part => parts.push(part),
            }
        }
        Ok(parts.join("/"))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn exists(&self, path: &str) -> bool {
        let Ok(key) = Self::normalize(path) else {
            return false;
        };
        if key.is_empty() {
            return true;
        }
        let inner = self.inner.read().await;
        inner.dirs.contains(&key) || inner.files.contains_key(&key)
    }

    async fn list_folders(&self, path: &str) -> Result<Vec<String>, StorageError> {
        let key = Self::normalize(path)?;
        let inner = self.inner.read().await;

        if !key.is_empty() && !inner.dirs.contains(&key) {
            if inner.files.contains_key(&key) {
                return Err(StorageError::NotADirectory { path: key });
            }
            return Ok(Vec::new());
        }

        let prefix = if key.is_empty() { String::new() } else { format!("{key}/") };
        let folders: Vec<String> = inner
            .dirs
            .iter()
            .filter_map(|dir| dir.strip_prefix(&prefix))
            .filter(|rest| !rest.is_empty() && !rest.contains('/'))
            .map(str::to_string)
            .collect();
        Ok(folders)
    }

    async fn mkdir(&self, path: &str) -> Result<(), StorageError> {
        let key = Self::normalize(path)?;
        let mut inner = self.inner.write().await;

        // Record every ancestor so listings see intermediate levels.
        let mut current = String::new();
        for part in key.split('/').filter(|part| !part.is_empty()) {
            if !current.is_empty() {
                current.push('/');
            }
            current.push_str(part);
            inner.dirs.insert(current.clone());
        }
        Ok(())
    }

    async fn create_file(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(), StorageError> {
        let key = Self::normalize(path)?;
        let parent = match key.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        };

        let mut contents = Vec::new();
        reader
            .read_to_end(&mut contents)
            .await
            .map_err(|e| StorageError::io("failed to read from stream", e))?;

        let mut inner = self.inner.write().await;
        if !parent.is_empty() && !inner.dirs.contains(&parent) {
            return Err(StorageError::io(
                format!("destination directory '{parent}' is missing"),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }
        inner.files.insert(key, contents);
        Ok(())
    }

    async fn read_file(
        &self,
        path: &str,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError> {
        let key = Self::normalize(path)?;
        let inner = self.inner.read().await;
        match inner.files.get(&key) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.clone()))),
            None => Err(StorageError::NotFound {
                path: path.to_string(),
            }),
        }
    }
}
