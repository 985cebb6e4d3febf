//! The `idl.yaml` configuration model.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors loading, saving, or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("the configuration file '{path}' does not exist, run 'idl init <name> <repository>' to create it")]
    Missing { path: String },

    #[error("failed to read configuration file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {source}")]
    Parse {
        #[from]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// A remote artifact this project wants pulled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub idl_type: String,
    /// Overrides the top-level repository for this dependency only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
}

/// A local directory root this project offers for push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provide {
    pub root: String,
    #[serde(rename = "type")]
    pub idl_type: String,
    /// Inline newline-separated ignore patterns, or the name of an ignore
    /// file in the current working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idlignore: Option<String>,
}

/// Contents of `idl.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Default remote base URL.
    #[serde(default)]
    pub repository: String,
    /// Project identity used when pushing.
    #[serde(default)]
    pub name: String,
    /// Local root for pulled dependencies.
    #[serde(default)]
    pub idl_directory: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<Provide>,
}

impl Configuration {
    /// Load from a YAML file. A missing file is reported with the hint to
    /// run `idl init`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing {
                    path: path.display().to_string(),
                })
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };
        Ok(serde_yaml::from_str(&text)?)
    }

    /// Write as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_yaml::to_string(self)?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// The repository a dependency should be fetched from: its own
    /// override if declared, the top-level repository otherwise.
    pub fn resolve_repository<'a>(&'a self, dependency: &'a Dependency) -> &'a str {
        match dependency.repository.as_deref() {
            Some(repository) if !repository.is_empty() => repository,
            _ => &self.repository,
        }
    }

    /// Check the declarations before any network or storage activity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repository.is_empty() {
            return Err(ConfigError::invalid("repository is required"));
        }

        if !self.dependencies.is_empty() && self.idl_directory.is_empty() {
            return Err(ConfigError::invalid(
                "idl_directory is required when dependencies are declared",
            ));
        }
        for dependency in &self.dependencies {
            if dependency.name.is_empty()
                || dependency.version.is_empty()
                || dependency.idl_type.is_empty()
            {
                return Err(ConfigError::invalid(
                    "every dependency requires name, version, and type",
                ));
            }
        }

        if !self.provides.is_empty() && self.name.is_empty() {
            return Err(ConfigError::invalid(
                "name is required when provides are declared",
            ));
        }
        for provide in &self.provides {
            if provide.root.is_empty() || provide.idl_type.is_empty() {
                return Err(ConfigError::invalid(
                    "every provide requires root and type",
                ));
            }
        }

        Ok(())
    }
}
