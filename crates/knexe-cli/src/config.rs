//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `KNEXE_*` environment variables, `__` between sections
//!    (`KNEXE_REGISTRY__URL`); a `.env` file is loaded first
//! 3. `--config <FILE>`, or else `.knexe.toml` in the current directory
//!    over the user configuration file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use knexe_adapters::DEFAULT_REGISTRY_URL;
use knexe_core::domain::Scope;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// File name of the per-workspace configuration.
pub const LOCAL_CONFIG_FILE: &str = ".knexe.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generator settings.
    pub generator: GeneratorConfig,
    /// npm registry settings.
    pub registry: RegistryConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// npm scope of generated packages, with or without the `@`.
    pub scope: String,
    /// Workspace root; the current directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_root: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub url: String,
    pub connect_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig {
                scope: Scope::DEFAULT.into(),
                workspace_root: None,
            },
            registry: RegistryConfig {
                url: DEFAULT_REGISTRY_URL.into(),
                connect_timeout_secs: 10,
                user_agent: None,
            },
            output: OutputConfig {
                no_color: false,
                format: "auto".into(),
            },
        }
    }
}

fn config_error(message: impl Into<String>, source: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: message.into(),
        source: Some(Box::new(source)),
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path passed via `--config`; it must exist.  Without
    /// it the user configuration file and `./.knexe.toml` are read when
    /// present.
    pub fn load(config_file: Option<&Path>) -> CliResult<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| config_error("Failed to build default configuration", e))?;
        let mut builder = Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "Reading configuration file");
                builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
            }
            None => {
                builder = builder
                    .add_source(File::from(Self::config_path()).format(FileFormat::Toml).required(false))
                    .add_source(File::from(Path::new(LOCAL_CONFIG_FILE)).format(FileFormat::Toml).required(false));
            }
        }

        let config = builder
            .add_source(
                Environment::with_prefix("KNEXE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| config_error("Failed to read configuration", e))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| config_error("Invalid configuration", e))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject values that would only fail later, deep inside a command.
    fn validate(&self) -> CliResult<()> {
        Scope::parse(&self.generator.scope).map_err(|e| CliError::ConfigError {
            message: format!("generator.scope: {e}"),
            source: None,
        })?;
        if self.registry.url.trim().is_empty() {
            return Err(CliError::ConfigError {
                message: "registry.url must not be empty".into(),
                source: None,
            });
        }
        Ok(())
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.knexe.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "knexe", "knexe")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The configured scope.
    pub fn scope(&self) -> CliResult<Scope> {
        Scope::parse(&self.generator.scope).map_err(|e| CliError::ConfigError {
            message: format!("generator.scope: {e}"),
            source: None,
        })
    }

    /// Value of a dotted key, rendered for display.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let value = match key {
            "generator.scope" => self.generator.scope.clone(),
            "generator.workspace_root" => self
                .generator
                .workspace_root
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "registry.url" => self.registry.url.clone(),
            "registry.connect_timeout_secs" => self.registry.connect_timeout_secs.to_string(),
            "registry.user_agent" => self.registry.user_agent.clone().unwrap_or_default(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            _ => {
                return Err(CliError::ConfigError {
                    message: format!("Unknown config key: '{key}'"),
                    source: None,
                });
            }
        };
        Ok(value)
    }

    /// TOML rendering of the whole configuration.
    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_scope_and_registry() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.generator.scope, "knexe");
        assert_eq!(cfg.registry.url, "https://registry.npmjs.org");
        assert_eq!(cfg.registry.connect_timeout_secs, 10);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knexe.toml");
        fs::write(
            &path,
            "[generator]\nscope = \"@acme\"\n\n[registry]\nurl = \"http://localhost:4873\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.generator.scope, "@acme");
        assert_eq!(cfg.registry.url, "http://localhost:4873");
        // Untouched keys keep their defaults.
        assert_eq!(cfg.registry.connect_timeout_secs, 10);
        assert_eq!(cfg.scope().unwrap().as_str(), "acme");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
    }

    #[test]
    fn invalid_scope_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knexe.toml");
        fs::write(&path, "[generator]\nscope = \"Not A Scope\"\n").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("registry.url").unwrap(), DEFAULT_REGISTRY_URL);
        assert_eq!(cfg.get("output.no_color").unwrap(), "false");
        assert!(matches!(
            cfg.get("does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn toml_round_trips_through_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knexe.toml");
        fs::write(&path, AppConfig::default().to_toml().unwrap()).unwrap();
        assert_eq!(AppConfig::load(Some(&path)).unwrap(), AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
