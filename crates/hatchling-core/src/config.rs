//! Configuration loading and typed config structures for Hatchling.
//!
//! The configuration lives in a YAML file (`hatchling.yaml` by default,
//! overridable with `HATCHLING_CONFIG`). Every section and field has a
//! default, so an absent file or a partial one is fine.
//!
//! ```yaml
//! pet:        # hatchling_pet::PetConfig
//!   food_decay: 5
//! schedule:
//!   tick_interval_ms: 30000
//!   max_catch_up_ticks: 100000
//! storage:
//!   dir: ".hatchling"
//!   slot_key: "pet"
//! logging:
//!   level: "info"
//!   json: false
//! ```

use std::path::{Path, PathBuf};

use hatchling_pet::PetConfig;
use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "HATCHLING_CONFIG";

/// Environment variable overriding `storage.dir`.
pub const STATE_DIR_ENV: &str = "HATCHLING_STATE_DIR";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "hatchling.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Hatchling configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HatchlingConfig {
    /// Pet mechanics: rates, thresholds, stage durations, cooldowns.
    #[serde(default)]
    pub pet: PetConfig,

    /// Tick heartbeat and catch-up bounds.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Where the pet is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HatchlingConfig {
    /// Load configuration from the YAML file at `path`.
    ///
    /// `HATCHLING_STATE_DIR` overrides `storage.dir` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.storage.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults (still applying
    /// env overrides).
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file) for an existing file.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            Self::parse("")
        }
    }

    /// The config path named by `HATCHLING_CONFIG`, or the default.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
    }
}

/// Tick heartbeat configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Wall-clock milliseconds per tick. Must be non-zero.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Most ticks replayed by one catch-up.
    #[serde(default = "default_max_catch_up_ticks")]
    pub max_catch_up_ticks: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_catch_up_ticks: default_max_catch_up_ticks(),
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// State directory for the JSON slot files.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    /// Slot key the pet is saved under.
    #[serde(default = "default_slot_key")]
    pub slot_key: String,
}

impl StorageConfig {
    /// Override `dir` with `HATCHLING_STATE_DIR` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = std::env::var_os(STATE_DIR_ENV) {
            self.dir = PathBuf::from(dir);
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            slot_key: default_slot_key(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit newline-delimited JSON instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_tick_interval_ms() -> u64 {
    30_000
}

const fn default_max_catch_up_ticks() -> u64 {
    100_000
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".hatchling")
}

fn default_slot_key() -> String {
    "pet".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
