//! Configuration management for rentbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::query::DateOrder;
use crate::record::Partner;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "rentbook";

/// Partition keys end up in file names, so they are restricted to this shape.
pub(crate) const PARTITION_KEY_PATTERN: &str = r"^[a-z0-9][a-z0-9_-]*$";

/// Whether `key` has the shape required of a partition key.
pub(crate) fn is_valid_partition_key(key: &str) -> bool {
    Regex::new(PARTITION_KEY_PATTERN).is_ok_and(|pattern| pattern.is_match(key))
}

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `RENTBOOK_`, sections split on `__`)
/// 2. TOML config file at `~/.config/rentbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Partition allow-list.
    pub partitions: PartitionsConfig,
    /// Query configuration.
    pub query: QueryConfig,
    /// Report configuration.
    pub report: ReportConfig,
    /// Field validation configuration.
    pub validation: ValidationConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one database file per partition.
    /// Defaults to `~/.local/share/rentbook`
    pub data_dir: Option<PathBuf>,
}

/// Known users and the partition each one maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionsConfig {
    /// User identifier to partition key. Identifiers match case-insensitively.
    pub users: BTreeMap<String, String>,
}

/// Query-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// How record dates are compared when sorting.
    pub date_order: DateOrder,
}

/// Report-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory reports are written to.
    /// Defaults to the current directory.
    pub output_dir: Option<PathBuf>,
    /// Image drawn in the top-left corner of the first page, if it exists.
    pub header_image: Option<PathBuf>,
    /// Title line.
    pub title: String,
    /// Optional second line under the title.
    pub subtitle: Option<String>,
    /// TrueType font embedded in reports. Without one, reports use the
    /// built-in Helvetica, which only covers Latin-1 text.
    pub font: Option<PathBuf>,
}

/// Field validation applied by the command-line shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject records whose partner is not listed below.
    pub enabled: bool,
    /// Accepted partner labels.
    pub partners: Vec<String>,
}

impl Default for PartitionsConfig {
    fn default() -> Self {
        Self {
            users: [("anas", "anas"), ("jawad", "jawad")]
                .into_iter()
                .map(|(user, key)| (user.to_string(), key.to_string()))
                .collect(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            header_image: Some(PathBuf::from("logo.jpg")),
            title: "Vehicle Report".to_string(),
            subtitle: None,
            font: None,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            partners: Partner::ALL.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("RENTBOOK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let key_pattern = Regex::new(PARTITION_KEY_PATTERN).map_err(|e| Error::ConfigValidation {
            message: format!("invalid partition key pattern: {e}"),
        })?;

        let mut seen_users = BTreeSet::new();
        let mut seen_keys = BTreeSet::new();
        for (user, key) in &self.partitions.users {
            if !key_pattern.is_match(key) {
                return Err(Error::ConfigValidation {
                    message: format!(
                        "partition key '{key}' for user '{user}' must match {PARTITION_KEY_PATTERN}"
                    ),
                });
            }
            if !seen_users.insert(user.trim().to_lowercase()) {
                return Err(Error::ConfigValidation {
                    message: format!("user '{user}' is listed more than once"),
                });
            }
            if !seen_keys.insert(key.as_str()) {
                return Err(Error::ConfigValidation {
                    message: format!("partition key '{key}' is shared by several users"),
                });
            }
        }

        if self.validation.enabled && self.validation.partners.is_empty() {
            return Err(Error::ConfigValidation {
                message: "validation is enabled but no partners are listed".to_string(),
            });
        }

        if self.report.title.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "report title must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the partition data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the report output directory, resolving defaults if not set.
    #[must_use]
    pub fn report_dir(&self) -> PathBuf {
        self.report
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
