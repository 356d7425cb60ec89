use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Please provide a value for {0}")]
    MissingOption(String),

    #[error("Invalid value for {option}: {reason}")]
    InvalidValue { option: String, reason: String },

    #[error("Settings file given by TENANTSTACK_CONFIG does not exist: {}", .0.display())]
    SettingsFileMissing(PathBuf),

    #[error("Failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
