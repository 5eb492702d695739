//! Configuration
//!
//! Sources are merged in this order (later sources override earlier):
//! 1. Default values from `LintConfig::default()`
//! 2. TOML configuration file (explicit path, or `vlint.toml` discovered)
//! 3. Environment variables with prefix, `__` separating nested keys
//!    (e.g. `VLINT_RULES__FAIL_ON=warning`)

use crate::error::{LintError, Result};
use crate::logging::parse_log_level;
use crate::violation::Severity;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_PREFIX: &str = "VLINT";
pub const DEFAULT_CONFIG_FILENAME: &str = "vlint.toml";
pub const DEFAULT_CONFIG_DIR: &str = "vlint";

/// Top-level linter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub project: ProjectConfig,
    pub rules: RulesConfig,
    pub logging: LoggingConfig,
}

/// Where project definitions live. Directories are relative to `root`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub models_dir: PathBuf,
    pub check_suites_dir: PathBuf,
    /// Declarative rule definitions
    pub rules_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            models_dir: PathBuf::from("models"),
            check_suites_dir: PathBuf::from("checks"),
            rules_dir: PathBuf::from("linter"),
        }
    }
}

impl ProjectConfig {
    pub fn models_path(&self) -> PathBuf {
        self.root.join(&self.models_dir)
    }

    pub fn check_suites_path(&self) -> PathBuf {
        self.root.join(&self.check_suites_dir)
    }

    pub fn rules_path(&self) -> PathBuf {
        self.root.join(&self.rules_dir)
    }
}

/// Rule selection and grading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule names to skip
    pub disabled: Vec<String>,
    /// Lowest severity that fails the run
    pub fail_on: Severity,
    /// Per-rule severity overrides
    pub severity: BTreeMap<String, Severity>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            fail_on: Severity::Error,
            severity: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl LintConfig {
    /// Render as TOML, e.g. to bootstrap a config file
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LintError::Config(format!("Failed to serialize config to TOML: {e}")))
    }
}

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    #[must_use]
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources.
    ///
    /// An explicit config path that does not exist is an error; a missing
    /// discovered file is not. Nothing is logged here since logging is
    /// configured from the result; see [`log_config_loaded`].
    ///
    /// [`log_config_loaded`]: crate::logging::log_config_loaded
    pub fn load(&self) -> Result<LintConfig> {
        if let Some(config_path) = self.config_path.as_ref().filter(|path| !path.exists()) {
            return Err(LintError::Config(format!(
                "Configuration file not found: {}",
                config_path.display()
            )));
        }

        let mut figment = Figment::new().merge(Serialized::defaults(LintConfig::default()));
        if let Some(path) = self.source_path() {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        let config: LintConfig = figment.extract()?;
        validate_config(&config)?;
        Ok(config)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// TOML file `load` reads: the explicit path, else the first discovered
    /// default location
    pub fn source_path(&self) -> Option<PathBuf> {
        self.config_path
            .clone()
            .or_else(Self::find_default_config_path)
    }

    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(format!(".{DEFAULT_CONFIG_DIR}"))
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_config(config: &LintConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    if config.rules.disabled.iter().any(|name| name.trim().is_empty()) {
        return Err(LintError::Config(
            "Disabled rule names cannot be empty".to_string(),
        ));
    }
    Ok(())
}
