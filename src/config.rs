use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::permissions::PlatformVersion;

/// Top-level configuration for the viewer.
///
/// Every section has defaults, so a partial (or missing) file is fine.
///
/// # Loading
///
/// ```rust,no_run
/// use exif_viewer::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("exif-viewer.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.platform.api_level = Some(30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host platform overrides.
    pub platform: PlatformConfig,
    /// How headless front ends answer permission requests.
    pub permissions: PermissionConfig,
    /// Document picker behavior.
    pub picker: PickerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Force a platform API level instead of detecting it.
    pub api_level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// Grant every requested permission when no user is around to answer.
    pub auto_grant: bool,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self { auto_grant: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Directory the picker opens in.
    pub start_dir: Option<String>,
}

/// File name looked up next to the executable.
pub const CONFIG_FILE_NAME: &str = "exif-viewer.json";

impl Config {
    /// `exif-viewer.json` beside the running binary.
    pub fn config_path() -> Result<PathBuf> {
        let exe = std::env::current_exe().context("Cannot locate the viewer executable")?;
        let dir = exe
            .parent()
            .context("Viewer executable has no parent directory")?;
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    fn resolve(path: Option<&Path>) -> Result<PathBuf> {
        path.map_or_else(Self::config_path, |p| Ok(p.to_path_buf()))
    }

    /// Load the platform, permission and picker sections. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve(path)?;
        if !path.exists() {
            log::warn!(
                "No viewer config at {}; using default platform, permission and picker settings",
                path.display()
            );
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read viewer config {}", path.display()))?;
        let config: Config = serde_json::from_str(&json).with_context(|| {
            format!(
                "Invalid viewer config {} (expected platform/permissions/picker sections)",
                path.display()
            )
        })?;
        log::debug!(
            "Viewer config: api_level={:?} auto_grant={} start_dir={:?}",
            config.platform.api_level,
            config.permissions.auto_grant,
            config.picker.start_dir
        );
        Ok(config)
    }

    /// Write all sections as pretty JSON.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let path = Self::resolve(path)?;
        let json = serde_json::to_string_pretty(self).context("Failed to encode viewer config")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write viewer config {}", path.display()))?;
        log::info!("Viewer config written to {}", path.display());
        Ok(())
    }

    /// The platform version the permission gate should assume.
    pub fn platform_version(&self) -> PlatformVersion {
        PlatformVersion::detect(self.platform.api_level)
    }

    pub fn picker_start_dir(&self) -> Option<PathBuf> {
        self.picker
            .start_dir
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
    }
}
