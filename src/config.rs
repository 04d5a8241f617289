// ABOUTME: Application configuration loaded from config.toml with sensible defaults
// Covers call timing, classifier backend selection and simulated device settings

use crate::classifier::{Scene, PLACEHOLDER_SCENE_URI};
use crate::session::SessionConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Failure loading, saving or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No home directory to place config in
    #[error("Could not determine a configuration directory")]
    NoProjectDirs,

    /// Reading or writing a config file failed
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be written as TOML
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which classifier backs the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// Random demo verdicts
    #[default]
    Simulated,
    /// Remote endpoint
    Http,
}

/// `[classifier]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Backend selection
    pub backend: ClassifierBackend,
    /// Required for the http backend
    pub endpoint: Option<String>,
    /// Per-request timeout for the http backend
    pub timeout_secs: u64,
    /// Fixes the simulated backend's sequence
    pub seed: Option<u64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Simulated,
            endpoint: None,
            timeout_secs: 30,
            seed: None,
        }
    }
}

/// Settings for the simulated camera and location sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Simulate the user refusing camera access
    pub camera_denied: bool,
    /// Simulated origin latitude
    pub latitude: f64,
    /// Simulated origin longitude
    pub longitude: f64,
    /// Seconds between simulated fixes
    pub location_interval_secs: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            camera_denied: false,
            latitude: 37.422_00,
            longitude: -122.084_10,
            location_interval_secs: 3,
        }
    }
}

/// Top-level `config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Delay between SOS and the call going live
    pub settle_delay_ms: u64,
    /// Seconds between classifications
    pub poll_interval_secs: u64,
    /// How long toasts stay up
    pub notification_secs: u64,
    /// Guardian list file; defaults under the data dir
    pub guardians_path: Option<PathBuf>,
    /// Data URI sent to the classifier
    pub scene_uri: String,
    /// Classifier settings
    pub classifier: ClassifierConfig,
    /// Simulated device settings
    pub devices: DeviceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1500,
            poll_interval_secs: 5,
            notification_secs: 5,
            guardians_path: None,
            scene_uri: PLACEHOLDER_SCENE_URI.to_string(),
            classifier: ClassifierConfig::default(),
            devices: DeviceConfig::default(),
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Result<ProjectDirs, ConfigError> {
        ProjectDirs::from("", "", "guardian-keychain").ok_or(ConfigError::NoProjectDirs)
    }

    /// `config.toml` in the platform config directory
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Platform data directory for logs and the guardian list
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Load from the default location, falling back to defaults when no file exists
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_path(&path)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load and validate a specific file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write as pretty TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, content).map_err(io_err)
    }

    /// Reject settings the session cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid("poll_interval_secs must be at least 1".to_string()));
        }
        if self.devices.location_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "devices.location_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.classifier.backend == ClassifierBackend::Http && self.classifier.endpoint.is_none() {
            return Err(ConfigError::Invalid(
                "classifier.endpoint is required for the http backend".to_string(),
            ));
        }
        Scene::parse(self.scene_uri.as_str()).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }

    /// Guardian list location, defaulting to `<data dir>/guardians.json`
    pub fn guardians_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.guardians_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("guardians.json")),
        }
    }

    /// Runtime settings for a call session
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let scene = Scene::parse(self.scene_uri.as_str()).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(SessionConfig {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            notification_duration: Duration::from_secs(self.notification_secs),
            scene,
        })
    }
}
