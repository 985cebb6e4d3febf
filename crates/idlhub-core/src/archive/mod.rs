//! Archive packaging and unpacking.
//!
//! [`pack`] serializes a directory tree into a filtered tar+gzip stream;
//! [`unpack`] reverses it with idempotent replacement semantics. The two
//! halves are inverse operations: unpacking a packed tree into an empty
//! destination reproduces every non-ignored file with its relative path,
//! content, and mode.

pub mod pack;
pub mod unpack;

pub use pack::{pack_to_temp, pack_tree};
pub use unpack::unpack_tree;

/// Errors from packing or unpacking.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The source root to package could not be read.
    #[error("failed to read source root '{path}': {source}")]
    SourceRoot {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An archive entry name points outside the destination root.
    #[error("archive entry '{name}' escapes the destination root")]
    EntryEscape { name: String },

    /// Stream or filesystem failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
