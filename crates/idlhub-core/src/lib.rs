//! Core building blocks for the idlhub versioned-artifact store.
//!
//! The server and client crates are thin shells around what lives here:
//!
//! - [`storage`] — the path-confined [`Storage`](storage::Storage)
//!   capability with filesystem and in-memory implementations.
//! - [`layout`] + [`catalog`] — the mapping from an artifact address
//!   (project, type, version) to storage paths, and the tiered
//!   existence-checked read/write contracts over a storage.
//! - [`archive`] — packaging a directory tree into a tar+gzip stream and
//!   materializing such a stream back into a tree.
//! - [`ignore`] — glob-based filtering of packaged trees.
//! - [`config`] — the `idl.yaml` configuration model.
//! - [`version`] — semantic version validation for the client boundary.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ignore;
pub mod layout;
pub mod storage;
pub mod version;

pub use archive::{pack_to_temp, pack_tree, unpack_tree, ArchiveError};
pub use config::{Configuration, Dependency, Provide};
pub use error::{CatalogError, StorageError};
pub use ignore::IgnoreSpec;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use version::Version;
