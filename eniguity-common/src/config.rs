//! Configuration loading and layered setting resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is never fatal: the service logs a warning and starts
//! on defaults. A TOML file that exists but cannot be parsed is a
//! configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_PATH_ENV: &str = "ENIGUITY_CONFIG";

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is not set
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

/// On-disk TOML configuration
///
/// All fields are optional; anything left out falls through to the
/// compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub database_name: Option<String>,
    pub database_url: Option<String>,
    pub bind_address: Option<String>,
    pub upload_dir: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// OS-dependent defaults compiled into the binary
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub database_name: String,
    pub bind_address: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            database_name: "eniguity_diagnostics".to_string(),
            bind_address: "127.0.0.1:8001".to_string(),
            upload_dir: std::env::temp_dir(),
            max_upload_bytes: 25 * 1024 * 1024,
            log_level: default_log_level(),
        }
    }
}

/// Get OS-dependent default data folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/eniguity (or /var/lib/eniguity for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("eniguity"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/eniguity"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("eniguity"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/eniguity"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("eniguity"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\eniguity"))
    } else {
        PathBuf::from("./eniguity_data")
    }
}

/// Default TOML location: `<config_dir>/eniguity/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("eniguity").join("config.toml"))
}

/// Load a TOML config file
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    debug!(path = %path.display(), "Loaded TOML config");
    Ok(Some(config))
}

/// Locate and load the TOML config
///
/// Path priority: explicit CLI path → `ENIGUITY_CONFIG` → platform default.
/// An explicitly named file that is missing is reported as a warning, the
/// same as a missing default file.
pub fn resolve_toml_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    let path = cli_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
        .or_else(default_config_path);

    let Some(path) = path else {
        warn!("Could not determine config directory, using compiled defaults");
        return Ok(TomlConfig::default());
    };

    match load_toml_config(&path)? {
        Some(config) => Ok(config),
        None => {
            warn!(path = %path.display(), "Config file not found, using compiled defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Resolve one setting through CLI → ENV → TOML → default
///
/// An environment variable that is set but does not parse is a
/// configuration error rather than a silent fallback.
pub fn resolve_setting<T>(
    cli_arg: Option<T>,
    env_var_name: &str,
    toml_value: Option<T>,
    default: T,
) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    // Priority 1: Command-line argument
    if let Some(value) = cli_arg {
        return Ok(value);
    }

    // Priority 2: Environment variable
    if let Ok(raw) = std::env::var(env_var_name) {
        return raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", env_var_name, e)));
    }

    // Priority 3: TOML config file, Priority 4: compiled default
    Ok(toml_value.unwrap_or(default))
}
