use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::provider::GitProvider;

/// Default configuration embedded in the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("assets/config.toml");

/// Query parameters an OAuth round-trip appends to a location.
pub const DEFAULT_TRANSIENT_PARAMS: &[&str] = &["session", "session_state", "code"];

/// Error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}':\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Filenames to search for project-level configuration.
const CONFIG_FILENAMES: &[&str] = &["factory-location.toml", ".factory-location.toml"];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
}

/// How locations are serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    /// Parameters that are never written back into a location.
    #[serde(default = "default_transient_params")]
    pub transient_params: Vec<String>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            transient_params: default_transient_params(),
        }
    }
}

/// Additional hosts for the supported git providers.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Host -> provider, e.g. `"git.example.com" = "gitlab"`.
    #[serde(default)]
    pub hosts: HashMap<String, GitProvider>,
}

impl ProviderConfig {
    /// The provider configured for an exact host match.
    pub fn provider_for_host(&self, host: &str) -> Option<GitProvider> {
        self.hosts.get(host).copied()
    }
}

impl Config {
    /// Load configuration in the following order:
    /// 1. Project-level config (factory-location.toml or .factory-location.toml in current/parent dirs)
    /// 2. User-level config (~/.config/factory-location/config.toml)
    /// 3. Default embedded config
    ///
    /// Returns an error if a config file exists but is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = Self::project_config_path() {
            return Self::try_load_from_file(&path);
        }
        if let Some(path) = Self::user_config_path() {
            return Self::try_load_from_file(&path);
        }
        Self::embedded()
    }

    /// The configuration embedded from `assets/config.toml`.
    pub fn embedded() -> Result<Self, ConfigError> {
        toml::from_str(DEFAULT_CONFIG_TOML).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("assets/config.toml"),
            source: e,
        })
    }

    /// Load configuration from an explicitly specified path.
    ///
    /// Returns an error if the file doesn't exist or is malformed.
    /// If no path is specified, falls back to the default load order.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::try_load_from_file(p),
            None => Self::load(),
        }
    }

    /// Try to load config from a file, returning detailed errors on failure.
    fn try_load_from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn project_config_path() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::find_config_in_ancestors(&cwd)
    }

    fn xdg_config_dir() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "factory-location")?;
        Some(dirs.config_dir().to_path_buf())
    }

    pub fn user_config_path() -> Option<PathBuf> {
        let config_path = Self::xdg_config_dir()?.join("config.toml");
        config_path.exists().then_some(config_path)
    }

    fn find_config_in_ancestors(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for filename in CONFIG_FILENAMES {
                let config_path = current.join(filename);
                if config_path.exists() {
                    return Some(config_path);
                }
            }
            if !current.pop() {
                break;
            }
        }
        None
    }
}

fn default_transient_params() -> Vec<String> {
    DEFAULT_TRANSIENT_PARAMS
        .iter()
        .map(|param| param.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::embedded().expect("default config should parse");
        assert_eq!(config, Config::default());
        assert_eq!(
            config.location.transient_params,
            vec!["session", "session_state", "code"]
        );
        assert!(config.providers.hosts.is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_provider_hosts() {
        let config: Config = toml::from_str(
            r#"
            [providers.hosts]
            "git.example.com" = "gitlab"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.providers.provider_for_host("git.example.com"),
            Some(GitProvider::GitLab)
        );
        assert_eq!(config.providers.provider_for_host("example.com"), None);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result: Result<Config, _> = toml::from_str("[location]\nunknown = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_find_config_in_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(".factory-location.toml"),
            "[location]\ntransient_params = [\"token\"]\n",
        )
        .unwrap();

        let path = Config::find_config_in_ancestors(&nested).unwrap();
        let config = Config::load_from(Some(path.as_path())).unwrap();
        assert_eq!(config.location.transient_params, vec!["token"]);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(Some(dir.path().join("missing.toml").as_path()));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
