//! The storage capability and its implementations.
//!
//! Every filesystem touch in the repository goes through the [`Storage`]
//! trait. Paths handed to it are rooted at the storage base (they start
//! with `/`) and are resolved with confinement: a path that would escape
//! the base directory is rejected before any I/O happens.

mod fs;
mod memory;

pub use fs::FileStorage;
pub use memory::MemoryStorage;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use crate::error::StorageError;

/// Path-confined storage operations.
///
/// Missing targets are normalized into defined results where callers rely
/// on it: [`exists`](Storage::exists) never errors, and
/// [`list_folders`](Storage::list_folders) returns an empty sequence for a
/// path that does not exist so an as-yet-empty catalog level lists cleanly.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether `path` resolves inside the base directory and exists.
    /// Returns false for unresolvable paths instead of erroring.
    async fn exists(&self, path: &str) -> bool;

    /// Names of the immediate subdirectories of `path`, sorted. Files are
    /// excluded. A missing `path` yields an empty sequence, not an error.
    async fn list_folders(&self, path: &str) -> Result<Vec<String>, StorageError>;

    /// Create `path` and any missing ancestors. Idempotent.
    async fn mkdir(&self, path: &str) -> Result<(), StorageError>;

    /// Stream `reader` into a newly created (or truncated) file at `path`
    /// using bounded chunks. The destination directory must already exist.
    async fn create_file(
        &self,
        path: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<(), StorageError>;

    /// Open `path` for reading. Fails with [`StorageError::NotFound`] if it
    /// does not exist. The caller consumes and drops the stream.
    async fn read_file(
        &self,
        path: &str,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>, StorageError>;
}
