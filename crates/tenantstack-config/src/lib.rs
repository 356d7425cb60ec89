//! TenantStack settings
//!
//! An optional YAML settings file supplies defaults for the global options and
//! the tenant set. Values given on the command line or through the environment
//! always win over the file.
//!
//! ```yaml
//! profile: ops
//! region: us-west-2
//! stage: Gamma
//! subdomains: [blog, shop]
//! compute:
//!   total_cpu_units: 1024
//!   total_memory_mb: 992
//!   base_port: 9000
//! ```

pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "TENANTSTACK_CONFIG";
const APP_DIR: &str = "tenantstack";
const CANDIDATES: [&str; 2] = ["tenantstack.local.yaml", "tenantstack.yaml"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub stage: Option<String>,
    pub subdomains: Vec<String>,
    pub compute: ComputeSettings,
}

/// Overrides for the shared compute budget
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComputeSettings {
    pub total_cpu_units: Option<u32>,
    pub total_memory_mb: Option<u32>,
    pub base_port: Option<u16>,
}

/// Looks for a settings file
///
/// Search order:
/// 1. `TENANTSTACK_CONFIG` (must exist when set)
/// 2. current directory: `tenantstack.local.yaml`, `tenantstack.yaml`
/// 3. `<config_dir>/tenantstack/tenantstack.yaml`
pub fn find_settings_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::SettingsFileMissing(path));
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(APP_DIR).join("tenantstack.yaml");
        if global.exists() {
            return Ok(Some(global));
        }
    }

    Ok(None)
}

pub fn load_from(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Discovered settings, or defaults when there is no settings file
pub fn load() -> Result<Settings> {
    match find_settings_file()? {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            load_from(&path)
        }
        None => Ok(Settings::default()),
    }
}
