//! tar+gzip stream → directory tree.

use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::{Archive, EntryType};
use tracing::debug;

use crate::archive::ArchiveError;

/// Materialize the archive in `reader` under `dest`.
///
/// `dest` is removed recursively and recreated first, so unpacking is
/// idempotent and a pull never leaves residue from a previously unpacked
/// archive at the same destination. Directory entries are created with any
/// missing ancestors; regular-file entries are copied with a bounded
/// buffer and closed before the next entry is read; entry kinds the store
/// never produces (links, devices) are skipped without failing. Entry
/// names that would escape `dest` abort the unpack.
///
/// Stream corruption or filesystem errors abort immediately; files already
/// extracted at the failure point are left in place.
pub fn unpack_tree<R: Read>(reader: R, dest: &Path) -> Result<(), ArchiveError> {
    match std::fs::remove_dir_all(dest) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(ArchiveError::io("failed clearing destination", e)),
    }
    std::fs::create_dir_all(dest)
        .map_err(|e| ArchiveError::io("failed creating destination", e))?;

    let decoder = GzDecoder::new(reader);
    let mut archive = Archive::new(decoder);

    let mut entries = 0usize;
    for entry in archive
        .entries()
        .map_err(|e| ArchiveError::io("failed opening archive", e))?
    {
        let mut entry = entry.map_err(|e| ArchiveError::io("failed reading archive entry", e))?;
        let name = entry
            .path()
            .map_err(|e| ArchiveError::io("failed decoding entry name", e))?
            .into_owned();

        let relative = confine_entry_name(&name)?;
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(&relative);

        match entry.header().entry_type() {
            EntryType::Directory => {
                std::fs::create_dir_all(&target)
                    .map_err(|e| ArchiveError::io("failed creating directory", e))?;
            }
            EntryType::Regular => {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| ArchiveError::io("failed creating parent directory", e))?;
                }

                let mut file = File::create(&target)
                    .map_err(|e| ArchiveError::io("failed creating file", e))?;
                std::io::copy(&mut entry, &mut file)
                    .map_err(|e| ArchiveError::io("failed extracting file contents", e))?;
                // file closes here, before the next entry is read.

                #[cfg(unix)]
                if let Ok(mode) = entry.header().mode() {
                    use std::os::unix::fs::PermissionsExt;
                    std::fs::set_permissions(&target, std::fs::Permissions::from_mode(mode))
                        .map_err(|e| ArchiveError::io("failed setting file mode", e))?;
                }
            }
            _ => {}
        }
        entries += 1;
    }

    debug!(dest = %dest.display(), entries, "unpacked archive");
    Ok(())
}

/// Reject entry names that are absolute or climb out of the destination.
fn confine_entry_name(name: &Path) -> Result<PathBuf, ArchiveError> {
    let mut relative = PathBuf::new();
    for component in name.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::EntryEscape {
                    name: name.display().to_string(),
                })
            }
        }
    }
    Ok(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::pack_tree;
    use crate::ignore::IgnoreSpec;
    use std::io::Cursor;

    fn write_file(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn pack_dir(root: &Path, ignore: &IgnoreSpec) -> Vec<u8> {
        let mut archive = Vec::new();
        pack_tree(root, ignore, &mut archive).unwrap();
        archive
    }

    #[test]
    fn round_trip_preserves_paths_contents_and_mode() {
        let source = tempfile::tempdir().unwrap();
        write_file(source.path(), "api/v1/service.proto", "service Users {}");
        write_file(source.path(), "api/v1/types.proto", "message User {}");
        write_file(source.path(), "README.md", "# idls");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(
                source.path().join("README.md"),
                std::fs::Permissions::from_mode(0o755),
            )
            .unwrap();
        }

        let archive = pack_dir(source.path(), &IgnoreSpec::empty());

        let dest = tempfile::tempdir().unwrap();
        unpack_tree(Cursor::new(&archive), dest.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.path().join("api/v1/service.proto")).unwrap(),
            "service Users {}"
        );
        assert_eq!(
            std::fs::read_to_string(dest.path().join("api/v1/types.proto")).unwrap(),
            "message User {}"
        );
        assert_eq!(
            std::fs::read_to_string(dest.path().join("README.md")).unwrap(),
            "# idls"
        );

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(dest.path().join("README.md"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn ignored_files_are_absent_from_the_archive() {
        let source = tempfile::tempdir().unwrap();
        write_file(source.path(), "service.proto", "kept");
        write_file(source.path(), "scratch.tmp", "dropped");

        let ignore = IgnoreSpec::from_patterns(["*.tmp"]).unwrap();
        let archive = pack_dir(source.path(), &ignore);

        let dest = tempfile::tempdir().unwrap();
        unpack_tree(Cursor::new(&archive), dest.path()).unwrap();

        assert!(dest.path().join("service.proto").exists());
        assert!(!dest.path().join("scratch.tmp").exists());
    }

    #[test]
    fn ignored_directory_prunes_descendants_that_would_not_match_alone() {
        let source = tempfile::tempdir().unwrap();
        write_file(source.path(), "build/keepable.proto", "never packaged");
        write_file(source.path(), "src/service.proto", "kept");

        let ignore = IgnoreSpec::from_patterns(["build"]).unwrap();
        let archive = pack_dir(source.path(), &ignore);

        let dest = tempfile::tempdir().unwrap();
        unpack_tree(Cursor::new(&archive), dest.path()).unwrap();

        assert!(!dest.path().join("build").exists());
        assert!(dest.path().join("src/service.proto").exists());
    }

    #[test]
    fn unpack_replaces_prior_contents() {
        let first = tempfile::tempdir().unwrap();
        write_file(first.path(), "old.proto", "from version A");
        write_file(first.path(), "common.proto", "version A");

        let second = tempfile::tempdir().unwrap();
        write_file(second.path(), "common.proto", "version B");

        let dest = tempfile::tempdir().unwrap();
        let archive_a = pack_dir(first.path(), &IgnoreSpec::empty());
        unpack_tree(Cursor::new(&archive_a), dest.path()).unwrap();
        assert!(dest.path().join("old.proto").exists());

        let archive_b = pack_dir(second.path(), &IgnoreSpec::empty());
        unpack_tree(Cursor::new(&archive_b), dest.path()).unwrap();

        // Nothing from the first archive survives the second unpack.
        assert!(!dest.path().join("old.proto").exists());
        assert_eq!(
            std::fs::read_to_string(dest.path().join("common.proto")).unwrap(),
            "version B"
        );
    }

    #[test]
    fn unpack_twice_is_idempotent() {
        let source = tempfile::tempdir().unwrap();
        write_file(source.path(), "api/service.proto", "stable");

        let archive = pack_dir(source.path(), &IgnoreSpec::empty());
        let dest = tempfile::tempdir().unwrap();
        unpack_tree(Cursor::new(&archive), dest.path()).unwrap();
        unpack_tree(Cursor::new(&archive), dest.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(dest.path().join("api/service.proto")).unwrap(),
            "stable"
        );
    }

    #[test]
    fn escaping_entry_names_abort_the_unpack() {
        let mut builder = tar::Builder::new(Vec::new());
        // Header::set_path refuses `..`, so smuggle the name in through the
        // raw header bytes the way a hostile archive would arrive.
        let mut header = tar::Header::new_gnu();
        let name = b"../evil.txt";
        header.as_mut_bytes()[..name.len()].copy_from_slice(name);
        header.set_size(4);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, &b"boom"[..]).unwrap();
        let tar_bytes = builder.into_inner().unwrap();

        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut gz, &tar_bytes).unwrap();
        let archive = gz.finish().unwrap();

        let dest = tempfile::tempdir().unwrap();
        let err = unpack_tree(Cursor::new(&archive), dest.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::EntryEscape { .. }));
        assert!(!dest.path().parent().unwrap().join("evil.txt").exists());
    }

    #[test]
    fn unsupported_entry_types_are_skipped() {
        let mut builder = tar::Builder::new(Vec::new());

        let mut link = tar::Header::new_gnu();
        link.set_path("dangling").unwrap();
        link.set_entry_type(tar::EntryType::Symlink);
        link.set_link_name("nowhere").unwrap();
        link.set_size(0);
        link.set_cksum();
        builder.append(&link, &[][..]).unwrap();

        let mut file = tar::Header::new_gnu();
        file.set_path("kept.proto").unwrap();
        file.set_size(4);
        file.set_mode(0o644);
        file.set_cksum();
        builder.append(&file, &b"data"[..]).unwrap();
        let tar_bytes = builder.into_inner().unwrap();

        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut gz, &tar_bytes).unwrap();
        let archive = gz.finish().unwrap();

        let dest = tempfile::tempdir().unwrap();
        unpack_tree(Cursor::new(&archive), dest.path()).unwrap();

        assert!(!dest.path().join("dangling").exists());
        assert_eq!(
            std::fs::read_to_string(dest.path().join("kept.proto")).unwrap(),
            "data"
        );
    }

    #[test]
    fn truncated_stream_aborts() {
        let source = tempfile::tempdir().unwrap();
        let noise: Vec<u8> = (0u32..16384).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        std::fs::write(source.path().join("service.proto"), &noise).unwrap();

        let mut archive = pack_dir(source.path(), &IgnoreSpec::empty());
        archive.truncate(archive.len() / 2);

        let dest = tempfile::tempdir().unwrap();
        assert!(unpack_tree(Cursor::new(&archive), dest.path()).is_err());
    }
}
