//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `CHURN_` prefix, `__` between sections
//!    (`CHURN_INSTALL__ENABLED=false`)
//! 3. Config file (`--config FILE` or the platform config dir)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use churn_core::domain::{ConfigurationDraft, Language, PackageManager};

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Lowest-priority values for new projects.
    pub defaults: Defaults,
    pub install: InstallConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Kept as strings so the same aliases as the flags are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub language: Option<String>,
    pub package_manager: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Run the package manager (or forge) after writing files.
    pub enabled: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Also write logs to this file.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let env = Environment::with_prefix("CHURN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);

        match config_file {
            Some(path) => Self::build(path, true, env),
            None => Self::build(&Self::config_path(), false, env),
        }
    }

    fn build(file: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        let built = Config::builder()
            .set_default("install.enabled", true)?
            .set_default("output.no_color", false)?
            .add_source(
                File::from(file)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(env)
            .build()
            .with_context(|| format!("reading {}", file.display()))?;

        built
            .try_deserialize()
            .context("deserializing configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Falls back to `.churn.toml` in the current directory when the
    /// platform has no config dir.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "churn", "create-churn")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".churn.toml"))
    }

    /// Fill axes the user left open with the configured defaults.
    pub fn apply_defaults(&self, draft: &mut ConfigurationDraft) -> CliResult<()> {
        if draft.language.is_none() {
            draft.language = parse_default::<Language>("defaults.language", &self.defaults.language)?;
        }
        if draft.package_manager.is_none() {
            draft.package_manager =
                parse_default::<PackageManager>("defaults.package_manager", &self.defaults.package_manager)?;
        }
        Ok(())
    }
}

fn parse_default<T>(key: &str, value: &Option<String>) -> CliResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .as_deref()
        .map(|raw| {
            raw.parse::<T>().map_err(|e| CliError::ConfigError {
                message: format!("invalid value for {key}"),
                source: Some(Box::new(e)),
            })
        })
        .transpose()
}
