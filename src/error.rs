//! Error types for the gridcalc binary

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Refusing to read {}: file too large ({size} bytes)", .path.display())]
    TooLarge { path: PathBuf, size: u64 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
