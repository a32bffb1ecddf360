use cloudnav_resource_search::SearchConfig;
use cloudnav_search_session::SessionConfig;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading `cloudnav.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has the wrong shape
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("invalid [{section}] config: {message}")]
    Invalid {
        section: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudnavConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

impl CloudnavConfig {
    /// Loads `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search
            .validate()
            .map_err(|message| ConfigError::Invalid {
                section: "search",
                message,
            })?;
        self.session
            .validate()
            .map_err(|message| ConfigError::Invalid {
                section: "session",
                message,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let config = CloudnavConfig::from_toml("").unwrap();
        assert_eq!(config, CloudnavConfig::default());
    }

    #[test]
    fn sections_override_individual_fields() {
        let config = CloudnavConfig::from_toml(
            r#"
[search]
max_results = 25

[search.weights]
prefix = 70.0

[session]
history_limit = 5
"#,
        )
        .unwrap();
        assert_eq!(config.search.max_results, 25);
        assert_eq!(config.search.weights.prefix, 70.0);
        assert_eq!(config.search.weights.exact, 100.0);
        assert_eq!(config.session.history_limit, 5);
        assert_eq!(config.session.inline_suggestions, 3);
    }

    #[test]
    fn load_reports_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cloudnav.toml");
        fs::write(&path, "[session]\nhistory_limit = 0\n").unwrap();
        let err = CloudnavConfig::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { section: "session", .. }));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = CloudnavConfig::load(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
