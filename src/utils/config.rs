use crate::algorithms::distance::DistanceModel;
use crate::core::{DistanceUnit, MAX_EARTH_RADIUS_M, MEAN_EARTH_RADIUS_M, MIN_EARTH_RADIUS_M};
use crate::tracking::DEFAULT_SESSION_LABEL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Tracker configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Point-to-point distance model
    pub distance_model: DistanceModel,
    /// Sphere radius for the distance model (meters)
    pub earth_radius_m: f64,
    /// Unit used when reporting totals
    pub display_unit: DistanceUnit,
    /// Session label used when tracking starts without one
    pub default_label: String,
    /// Enable debug logging
    pub debug_logging: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            distance_model: DistanceModel::Haversine,
            earth_radius_m: MEAN_EARTH_RADIUS_M,
            display_unit: DistanceUnit::Miles,
            default_label: DEFAULT_SESSION_LABEL.to_string(),
            debug_logging: false,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.earth_radius_m.is_finite()
            || self.earth_radius_m < MIN_EARTH_RADIUS_M
            || self.earth_radius_m > MAX_EARTH_RADIUS_M
        {
            return Err(ConfigError::InvalidParameter {
                parameter: "earth_radius_m".to_string(),
                value: self.earth_radius_m.to_string(),
                reason: format!(
                    "Earth radius must be between {} and {} meters",
                    MIN_EARTH_RADIUS_M, MAX_EARTH_RADIUS_M
                ),
            });
        }

        if self.default_label.trim().is_empty() {
            return Err(ConfigError::InvalidParameter {
                parameter: "default_label".to_string(),
                value: format!("{:?}", self.default_label),
                reason: "Session label must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("{message}")]
    Io { message: String },
    /// JSON serialization/deserialization error
    #[error("{message}")]
    Serialization { message: String },
}

/// Loads, validates and persists the tracker configuration
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: TrackerConfig,
    config_file_path: Option<String>,
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Replace the configuration after validating it
    pub fn update(&mut self, config: TrackerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Switch distance model, returning the previous one
    pub fn set_distance_model(&mut self, model: DistanceModel) -> DistanceModel {
        let old = self.config.distance_model;
        self.config.distance_model = model;
        self.is_modified = true;
        old
    }

    /// Switch display unit, returning the previous one
    pub fn set_display_unit(&mut self, unit: DistanceUnit) -> DistanceUnit {
        let old = self.config.display_unit;
        self.config.display_unit = unit;
        self.is_modified = true;
        old
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: TrackerConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to parse config file '{}': {}", path_str, e),
        })?;

        config.validate()?;

        self.config = config;
        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(&path, content).map_err(|e| ConfigError::Io {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })?;

        self.config_file_path = Some(path_str);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::Io {
                message: "No file path set for saving configuration".to_string(),
            }),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tracker_config_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.distance_model, DistanceModel::Haversine);
        assert_eq!(config.earth_radius_m, 6_371_000.0);
        assert_eq!(config.display_unit, DistanceUnit::Miles);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_configuration_manager_creation() {
        let manager = ConfigurationManager::new();
        assert_eq!(manager.config(), &TrackerConfig::default());
        assert!(!manager.is_modified());
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let mut manager = ConfigurationManager::new();
        let config = TrackerConfig {
            earth_radius_m: 1000.0,
            ..TrackerConfig::default()
        };

        let result = manager.update(config);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "earth_radius_m"
        ));
        assert!(!manager.is_modified());

        let config = TrackerConfig {
            earth_radius_m: f64::NAN,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_label_rejected() {
        let config = TrackerConfig {
            default_label: "   ".to_string(),
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_setters_mark_modified() {
        let mut manager = ConfigurationManager::new();
        let old = manager.set_display_unit(DistanceUnit::Kilometers);
        assert_eq!(old, DistanceUnit::Miles);
        assert!(manager.is_modified());

        let old = manager.set_distance_model(DistanceModel::SphericalVector);
        assert_eq!(old, DistanceModel::Haversine);
        assert_eq!(manager.config().distance_model, DistanceModel::SphericalVector);
    }

    #[test]
    fn test_config_file_round_trip() {
        let path = temp_config_path("round_trip");
        let mut manager = ConfigurationManager::new();
        manager.set_display_unit(DistanceUnit::Kilometers);
        manager.set_distance_model(DistanceModel::Equirectangular);
        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.config(), manager.config());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let path = temp_config_path("partial");
        fs::write(&path, r#"{"display_unit": "meters", "debug_logging": true}"#).unwrap();

        let manager = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(manager.config().display_unit, DistanceUnit::Meters);
        assert!(manager.config().debug_logging);
        assert_eq!(manager.config().distance_model, DistanceModel::Haversine);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bad_config_file() {
        let path = temp_config_path("bad");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ConfigurationManager::from_file(&path),
            Err(ConfigError::Serialization { .. })
        ));

        fs::write(&path, r#"{"earth_radius_m": 5.0}"#).unwrap();
        assert!(matches!(
            ConfigurationManager::from_file(&path),
            Err(ConfigError::InvalidParameter { .. })
        ));
        fs::remove_file(&path).unwrap();

        assert!(matches!(ConfigurationManager::from_file(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_save_without_path() {
        let mut manager = ConfigurationManager::new();
        assert!(matches!(manager.save(), Err(ConfigError::Io { .. })));
    }
}
