// Fri Oct 16 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "CodeVeinFix.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FixConfig {
    pub name: String,
    pub master_enable: bool,
    pub resolution: Resolution,
    pub fixes: FixesConfig,
}

/// Target output size. `0x0` means "use the display's current resolution".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixesConfig {
    pub resolution: ToggleConfig,
    pub pillarbox: ToggleConfig,
    pub fov: FovConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    pub enable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FovConfig {
    pub enable: bool,
    pub multiplier: f32,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            name: "CodeVeinFix".to_string(),
            master_enable: true,
            resolution: Resolution::default(),
            fixes: FixesConfig::default(),
        }
    }
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self { enable: true }
    }
}

impl Default for FovConfig {
    fn default() -> Self {
        Self {
            enable: true,
            multiplier: 1.0,
        }
    }
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_unset(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f32 / self.height as f32)
    }

    /// Width and height divided by their gcd, e.g. `(32, 9)` for 5120x1440.
    pub fn reduced(&self) -> (u32, u32) {
        let divisor = gcd(self.width, self.height).max(1);
        (self.width / divisor, self.height / divisor)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Resolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::ValidationError(format!("resolution '{}' is not WIDTHxHEIGHT", s));
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        Ok(Self { width, height })
    }
}

pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl FixConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext.to_lowercase().as_str() {
            "json" => serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let contents = match ext.to_lowercase().as_str() {
            "json" => serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        fs::write(path, contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let multiplier = self.fixes.fov.multiplier;
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "fixes.fov.multiplier must be a positive number, got {}",
                multiplier
            )));
        }

        if (self.resolution.width == 0) != (self.resolution.height == 0) {
            return Err(ConfigError::ValidationError(format!(
                "resolution {} must set both width and height, or neither",
                self.resolution
            )));
        }

        Ok(())
    }

    pub fn resolution_enabled(&self) -> bool {
        self.master_enable && self.fixes.resolution.enable
    }

    pub fn pillarbox_enabled(&self) -> bool {
        self.master_enable && self.fixes.pillarbox.enable
    }

    pub fn fov_enabled(&self) -> bool {
        self.master_enable && self.fixes.fov.enable
    }
}

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Serialize error: {0}")]
    SerializeError(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}
