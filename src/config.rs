//! Daemon configuration
//!
//! Only host paths and presentation live here. The identity constants
//! (`MSHW0040`, `VGBI`, device id 5) are fixed at compile time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use surfacebook2_acpi::{ACPI_CALL_PATH, SYSFS_ACPI_DEVICES};

/// Runtime directory for exported GPIO naming tables
pub const RUNTIME_DIR: &str = "/run/surfacebook2-button";

/// Complete daemon configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Where enumerated ACPI devices are listed
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
    /// `acpi_call` interface used for `_DSM`
    #[serde(default = "default_acpi_call_path")]
    pub acpi_call_path: PathBuf,
    /// Where GPIO naming tables are exported
    #[serde(default = "default_runtime_dir")]
    pub runtime_dir: PathBuf,
    /// Prefix for the names of the virtual input devices
    #[serde(default = "default_device_name")]
    pub device_name: String,
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from(SYSFS_ACPI_DEVICES)
}
fn default_acpi_call_path() -> PathBuf {
    PathBuf::from(ACPI_CALL_PATH)
}
fn default_runtime_dir() -> PathBuf {
    PathBuf::from(RUNTIME_DIR)
}
fn default_device_name() -> String {
    "Surface Book 2 Buttons".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            acpi_call_path: default_acpi_call_path(),
            runtime_dir: default_runtime_dir(),
            device_name: default_device_name(),
            log_level: default_log_level(),
        }
    }
}

impl DriverConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("surfacebook2-button")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DriverConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
