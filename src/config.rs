use directories::ProjectDirs;
use gridcalc_core::GridConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    grid: Option<GridConfig>,
}

pub(crate) fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("me", "shoryuken", "gridcalc")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

fn read_config_file(path: &Path) -> Result<GridConfig> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)?;
    Ok(file.grid.unwrap_or_default())
}

/// Load the grid configuration.
///
/// An explicit `config_file` must exist; the per-user file is optional.
/// Problems never abort loading: they are returned as warnings and the
/// defaults are used instead.
pub fn load_config(config_file: Option<&PathBuf>) -> (GridConfig, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (GridConfig::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (GridConfig::default(), warnings);
    }

    match read_config_file(&path) {
        Ok(config) => (config, warnings),
        Err(err) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), err));
            (GridConfig::default(), warnings)
        }
    }
}
