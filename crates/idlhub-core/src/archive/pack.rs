//! Directory tree → tar+gzip stream.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::Builder;
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

use crate::archive::ArchiveError;
use crate::ignore::IgnoreSpec;

/// Serialize the tree under `root` into `writer` as tar+gzip.
///
/// The walk is depth-first in walk order; an entry whose root-relative path
/// matches `ignore` is skipped, and an ignored directory prunes its whole
/// subtree without visiting the descendants. The root entry itself is not
/// written. Directories get a header only; regular files get header plus
/// content, with each source file opened and closed within its own
/// iteration so at most one stays open regardless of tree size. Other
/// entry kinds (symlinks, sockets) are not packaged.
///
/// Both the tar stream and the gzip stream are finalized before returning,
/// so on success `writer` holds a complete archive.
pub fn pack_tree<W: Write>(
    root: &Path,
    ignore: &IgnoreSpec,
    writer: W,
) -> Result<(), ArchiveError> {
    std::fs::metadata(root).map_err(|source| ArchiveError::SourceRoot {
        path: root.display().to_string(),
        source,
    })?;

    let encoder = GzEncoder::new(writer, Compression::default());
    let mut tar = Builder::new(encoder);

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        match entry.path().strip_prefix(root) {
            // The root itself always passes; pruning it would end the walk.
            Ok(relative) if relative.as_os_str().is_empty() => true,
            Ok(relative) => !ignore.is_ignored(relative),
            Err(_) => true,
        }
    });

    let mut entries = 0usize;
    for entry in walker {
        let entry = entry.map_err(|e| ArchiveError::io("failed walking source tree", e.into()))?;
        let relative = match entry.path().strip_prefix(root) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative,
            _ => continue,
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            tar.append_dir(relative, entry.path())
                .map_err(|e| ArchiveError::io("failed writing directory to tar", e))?;
        } else if file_type.is_file() {
            let mut file = File::open(entry.path())
                .map_err(|e| ArchiveError::io("failed opening source file", e))?;
            tar.append_file(relative, &mut file)
                .map_err(|e| ArchiveError::io("failed writing file to tar", e))?;
        }
        entries += 1;
    }

    let encoder = tar
        .into_inner()
        .map_err(|e| ArchiveError::io("failed finalizing tar stream", e))?;
    encoder
        .finish()
        .map_err(|e| ArchiveError::io("failed finalizing gzip stream", e))?;

    debug!(root = %root.display(), entries, "packed source tree");
    Ok(())
}

/// Package `root` into a named temporary file, ready for upload.
pub fn pack_to_temp(root: &Path, ignore: &IgnoreSpec) -> Result<NamedTempFile, ArchiveError> {
    let mut archive = NamedTempFile::new()
        .map_err(|e| ArchiveError::io("failed creating temporary archive", e))?;
    pack_tree(root, ignore, &mut archive)?;
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_reported() {
        let err = pack_tree(
            Path::new("definitely/not/here"),
            &IgnoreSpec::empty(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveError::SourceRoot { .. }));
    }

    #[test]
    fn pack_to_temp_produces_a_complete_archive() {
        let source = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("a.proto"), b"syntax = \"proto3\";").unwrap();

        let archive = pack_to_temp(source.path(), &IgnoreSpec::empty()).unwrap();
        let metadata = std::fs::metadata(archive.path()).unwrap();
        // A finalized gzip stream is never smaller than its 10-byte header
        // plus the 8-byte trailer.
        assert!(metadata.len() > 18);
    }
}
