//! Ignore-pattern filtering for packaged trees.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Default ignore file name, looked up in the current working directory.
pub const DEFAULT_IGNORE_FILE: &str = ".idlignore";

/// Errors building an ignore spec.
#[derive(Debug, thiserror::Error)]
pub enum IgnoreError {
    #[error("invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("failed reading ignore file '{path}': {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An ordered set of glob patterns matched against paths relative to the
/// packaged root. Blank lines and `#` comments are skipped; a trailing `/`
/// marks a directory pattern and is stripped before compiling. An empty
/// spec admits everything.
#[derive(Debug)]
pub struct IgnoreSpec {
    set: GlobSet,
    patterns: Vec<String>,
}

impl IgnoreSpec {
    /// A spec that ignores nothing.
    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
            patterns: Vec::new(),
        }
    }

    /// Compile a list of pattern lines.
    pub fn from_patterns<I, S>(lines: I) -> Result<Self, IgnoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let pattern = line.trim_end_matches('/');
            let glob = Glob::new(pattern).map_err(|source| IgnoreError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
            patterns.push(pattern.to_string());
        }

        let set = builder.build().map_err(|source| IgnoreError::Pattern {
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(Self { set, patterns })
    }

    /// Load patterns from an ignore file. A missing file yields the empty
    /// spec so an undeclared ignore admits everything.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IgnoreError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_patterns(text.lines()),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(Self::empty()),
            Err(source) => Err(IgnoreError::File {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Resolve a provide's `idlignore` declaration.
    ///
    /// A multi-line value is an inline pattern list; a single-line value
    /// names an ignore file to load from the current working directory;
    /// an absent or blank value falls back to [`DEFAULT_IGNORE_FILE`].
    pub fn resolve(declared: Option<&str>) -> Result<Self, IgnoreError> {
        let declared = declared.map(|value| value.replace("\r\n", "\n"));
        match declared.as_deref().map(str::trim) {
            None | Some("") => Self::from_file(DEFAULT_IGNORE_FILE),
            Some(value) if value.contains('\n') => Self::from_patterns(value.lines()),
            Some(file_name) => Self::from_file(file_name),
        }
    }

    /// Whether `relative` (a path under the packaged root) is excluded.
    pub fn is_ignored(&self, relative: &Path) -> bool {
        self.set.is_match(relative)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_admits_everything() {
        let spec = IgnoreSpec::empty();
        assert!(!spec.is_ignored(Path::new("anything/at/all.proto")));
    }

    #[test]
    fn matches_relative_paths() {
        let spec = IgnoreSpec::from_patterns(["*.tmp", "build"]).unwrap();
        assert!(spec.is_ignored(Path::new("scratch.tmp")));
        assert!(spec.is_ignored(Path::new("nested/deep/scratch.tmp")));
        assert!(spec.is_ignored(Path::new("build")));
        assert!(!spec.is_ignored(Path::new("service.proto")));
    }

    #[test]
    fn skips_comments_and_blanks_and_directory_slashes() {
        let spec =
            IgnoreSpec::from_patterns(["# generated outputs", "", "target/", "  "]).unwrap();
        assert_eq!(spec.patterns(), ["target"]);
        assert!(spec.is_ignored(Path::new("target")));
    }

    #[test]
    fn resolve_prefers_inline_multi_line_patterns() {
        let spec = IgnoreSpec::resolve(Some(".noise\n.tmp\n*~")).unwrap();
        assert_eq!(spec.patterns(), [".noise", ".tmp", "*~"]);
        assert!(spec.is_ignored(Path::new("editor.swp~")));
    }

    #[test]
    fn resolve_handles_windows_line_endings() {
        let spec = IgnoreSpec::resolve(Some(".noise\r\n.tmp")).unwrap();
        assert_eq!(spec.patterns(), [".noise", ".tmp"]);
    }

    #[test]
    fn single_line_value_names_a_file_and_missing_file_is_empty() {
        let spec = IgnoreSpec::resolve(Some("definitely_not_a_real_ignore_file")).unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn loads_patterns_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ignores");
        std::fs::write(&file, "# comment\n*.log\nvendor/\n").unwrap();

        let spec = IgnoreSpec::from_file(&file).unwrap();
        assert_eq!(spec.patterns(), ["*.log", "vendor"]);
        assert!(spec.is_ignored(Path::new("api/debug.log")));
        assert!(spec.is_ignored(Path::new("vendor")));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = IgnoreSpec::from_patterns(["a[unclosed"]).unwrap_err();
        assert!(matches!(err, IgnoreError::Pattern { .. }));
    }
}
