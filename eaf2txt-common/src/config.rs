//! Configuration loading and database path resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the annotation database
pub const DATABASE_ENV_VAR: &str = "EAF2TXT_DATABASE";

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Database to log annotations into
    pub database: Option<PathBuf>,
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }
}

/// Database path resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. None (annotations are not logged)
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
) -> Result<Option<PathBuf>> {
    let config_file = find_config_file();
    resolve_database_path_from(cli_arg, env_var_name, config_file.as_deref())
}

/// Same as [`resolve_database_path`] with an explicit config file location
pub fn resolve_database_path_from(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config_file: Option<&Path>,
) -> Result<Option<PathBuf>> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(Some(path.to_path_buf()));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Ok(Some(PathBuf::from(path)));
        }
    }

    // Priority 3: TOML config file
    if let Some(config_path) = config_file.filter(|p| p.exists()) {
        debug!("Reading config file {}", config_path.display());
        return Ok(TomlConfig::load(config_path)?.database);
    }

    Ok(None)
}

/// Locate the platform config file, if one exists
fn find_config_file() -> Option<PathBuf> {
    // ~/.config/eaf2txt/config.toml (or the platform equivalent)
    let user_config = dirs::config_dir().map(|d| d.join("eaf2txt").join("config.toml"));
    if let Some(path) = user_config.filter(|p| p.exists()) {
        return Some(path);
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/eaf2txt/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}
