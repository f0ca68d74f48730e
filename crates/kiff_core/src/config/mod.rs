//! Configuration system
//!
//! Bootstrap settings can come from a TOML or RON file; anything left out
//! falls back to the built-in defaults (a 640×480 "Test App" window with
//! validation following the build type).

use ash::vk;
pub use serde::Deserialize;
use std::path::Path;

use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, ENABLE_VALIDATION_LAYERS};
use crate::render::InstanceInfo;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "KIFF_CONFIG";

/// File names probed in the working directory when no path is given
pub const DEFAULT_CONFIG_FILES: &[&str] = &["kiff.toml", "kiff.ron"];

/// Configuration trait
pub trait Config: for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Window creation settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: u32,
    /// Window height
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Test App".to_string(),
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Everything the bootstrap sequence needs to know up front
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Application name reported to the driver
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Engine name reported to the driver
    pub engine_name: String,
    /// Engine version (major, minor, patch)
    pub engine_version: (u32, u32, u32),
    /// Window settings
    pub window: WindowConfig,
    /// Whether to enable Vulkan validation layers; `None` follows the build type
    pub enable_validation: Option<bool>,
}

impl BootstrapConfig {
    /// Create a configuration for the named application
    pub fn new(app_name: impl Into<String>) -> Self {
        let app_name = app_name.into();
        Self {
            window: WindowConfig {
                title: app_name.clone(),
                ..WindowConfig::default()
            },
            application_name: app_name,
            ..Self::default()
        }
    }

    /// Set application version
    #[must_use]
    pub fn with_version(mut self, major: u32, minor: u32, patch: u32) -> Self {
        self.application_version = (major, minor, patch);
        self
    }

    /// Set window size
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window.width = width;
        self.window.height = height;
        self
    }

    /// Enable or disable validation layers
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = Some(enabled);
        self
    }

    /// Resolved validation setting
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(ENABLE_VALIDATION_LAYERS)
    }

    /// Instance metadata derived from this configuration
    pub fn instance_info(&self) -> InstanceInfo {
        let (major, minor, patch) = self.application_version;
        let (engine_major, engine_minor, engine_patch) = self.engine_version;
        InstanceInfo {
            app_name: self.application_name.clone(),
            app_version: vk::make_api_version(0, major, minor, patch),
            engine_name: self.engine_name.clone(),
            engine_version: vk::make_api_version(0, engine_major, engine_minor, engine_patch),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::Invalid("Application name cannot be empty".to_string()));
        }
        if self.engine_name.is_empty() {
            return Err(ConfigError::Invalid("Engine name cannot be empty".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }

    /// Load from `KIFF_CONFIG` or the first default file present, else defaults
    pub fn discover() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).ok().or_else(|| {
            DEFAULT_CONFIG_FILES
                .iter()
                .find(|candidate| Path::new(candidate).exists())
                .map(|candidate| (*candidate).to_string())
        });

        let config = match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path);
                Self::load_from_file(&path)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            application_name: "Test App".to_string(),
            application_version: (1, 0, 0),
            engine_name: "Test Engine".to_string(),
            engine_version: (1, 0, 0),
            window: WindowConfig::default(),
            enable_validation: None,
        }
    }
}

impl Config for BootstrapConfig {}
