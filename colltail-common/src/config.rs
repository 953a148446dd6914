//! Configuration loading and data file resolution
//!
//! Data file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `COLLTAIL_DATA` environment variable
//! 3. `data_file` key in the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! Missing or unreadable config files are never fatal: a warning is logged
//! and compiled defaults apply.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the data tree file
pub const DATA_FILE_ENV: &str = "COLLTAIL_DATA";

/// Default name of the collation data tree
pub const DEFAULT_TREE: &str = "coll";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (`error`..`trace`)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tree() -> String {
    DEFAULT_TREE.to_string()
}

/// Contents of `colltail.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Path to the TOML data tree file
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Name of the collation data tree inside the data file
    #[serde(default = "default_tree")]
    pub tree: String,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            tree: default_tree(),
            logging: LoggingConfig::default(),
        }
    }
}

/// OS-dependent compiled defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub data_file: PathBuf,
    pub tree: String,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            data_file: default_data_file(),
            tree: default_tree(),
            log_level: default_log_level(),
        }
    }
}

/// Get OS-dependent default data file path
fn default_data_file() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/colltail/tree.toml (or /usr/share for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("colltail").join("tree.toml"))
            .unwrap_or_else(|| PathBuf::from("/usr/share/colltail/tree.toml"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("colltail").join("tree.toml"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/colltail/tree.toml"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("colltail").join("tree.toml"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\colltail\\tree.toml"))
    } else {
        PathBuf::from("./colltail_data/tree.toml")
    }
}

/// Locate the config file for the platform, if one exists
fn find_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("colltail").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/colltail/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Resolves the data file and effective configuration
///
/// An explicit config path replaces the platform config lookup.
#[derive(Debug, Clone, Default)]
pub struct DataFileResolver {
    config_path: Option<PathBuf>,
}

impl DataFileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` instead of searching the platform config locations
    pub fn with_config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load the TOML config, falling back to defaults on any failure
    pub fn load_config(&self) -> TomlConfig {
        let path = match self.config_path.clone().or_else(find_config_file) {
            Some(path) => path,
            None => {
                debug!("No config file found, using compiled defaults");
                return TomlConfig::default();
            }
        };

        match load_toml_config(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                TomlConfig::default()
            }
        }
    }

    /// Resolve the data file path using the four-tier priority order
    pub fn resolve(&self, cli_arg: Option<&Path>) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return path.to_path_buf();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(DATA_FILE_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = self.load_config().data_file {
            return path;
        }

        // Priority 4: OS-dependent compiled default
        CompiledDefaults::for_current_platform().data_file
    }
}
