//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the [`LoaderCalls`] built
//! from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`DBSOURCE_` prefix, `__` between sections,
//!    e.g. `DBSOURCE_CALLS__CHECK`)
//! 3. Config file (`--config`, `./.dbsource.toml`, or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use dbsource_core::domain::{DomainError, LoaderCalls};

/// File name used for a configuration in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".dbsource.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template database connection.
    pub database: DatabaseConfig,
    /// Stored calls used to resolve, load and check templates.
    pub calls: CallsConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CallsConfig {
    pub resolve: String,
    pub load: String,
    /// Leave unset or blank to disable freshness checking.
    pub check: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for CallsConfig {
    fn default() -> Self {
        Self {
            resolve: "SELECT template_api.find_template($1)".into(),
            load: "SELECT template_api.load_template($1)".into(),
            check: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl CallsConfig {
    /// Validate into the descriptors the loader runs.
    pub fn to_loader_calls(&self) -> Result<LoaderCalls, DomainError> {
        LoaderCalls::new(&self.resolve, &self.load, self.check.as_deref())
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist.  Without it the discovered path is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = Self::resolve_path(config_file.map(PathBuf::as_path));

        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(config_file.is_some()),
            )
            .add_source(
                Environment::with_prefix("DBSOURCE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration has invalid values")
    }

    /// The file `load` reads: the explicit path, else a local
    /// `.dbsource.toml` if present, else the platform default.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return local;
        }
        Self::config_path()
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.dbsource.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "dbsource", "dbsource")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_calls_disable_checking() {
        let cfg = AppConfig::default();
        assert!(cfg.calls.check.is_none());
        let calls = cfg.calls.to_loader_calls().unwrap();
        assert!(!calls.check.is_enabled());
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn blank_resolve_call_is_rejected() {
        let calls = CallsConfig {
            resolve: "  ".into(),
            ..CallsConfig::default()
        };
        assert!(calls.to_loader_calls().is_err());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[calls]\ncheck = \"SELECT template_api.template_ts($1)\"\n\n[database]\nurl = \"postgres://localhost/t\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(
            cfg.calls.check.as_deref(),
            Some("SELECT template_api.template_ts($1)")
        );
        assert_eq!(cfg.database.url.as_deref(), Some("postgres://localhost/t"));
        // untouched keys keep their defaults
        assert_eq!(cfg.calls.resolve, CallsConfig::default().resolve);
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_path_wins() {
        let p = Path::new("/tmp/custom.toml");
        assert_eq!(AppConfig::resolve_path(Some(p)), p);
    }

    #[test]
    fn config_path_is_absolute_or_relative() {
        // Just assert it doesn't panic and returns a non-empty path.
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
