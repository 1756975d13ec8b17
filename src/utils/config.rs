use crate::core::{Waypoint, DEFAULT_ENTITY_ID, METERS_PER_KM, SECONDS_PER_HOUR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Motion parameters for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Vehicle speed (km/h)
    pub speed_kmh: f64,
    /// Wall-clock time between ticks (seconds)
    pub interval_sec: f64,
    /// Restart from the first waypoint after the last one
    pub loop_route: bool,
    /// Report `NO_GPS_FIX` and withhold coordinates
    pub no_fix: bool,
}

/// Remote store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Base URL of the JSON key-value store
    pub database_url: String,
    /// Identifier of the simulated vehicle
    pub entity_id: String,
    /// Path segment under which entity state records live
    pub collection: String,
    /// Static auth token, sent as the `auth` query parameter
    pub auth: Option<String>,
    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

/// Complete simulator configuration file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub simulation: SimulationConfig,
    pub sink: SinkConfig,
    /// Route waypoints in travel order
    pub route: Vec<Waypoint>,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },
    /// Configuration file I/O error
    #[error("{message}")]
    Io { message: String },
    /// JSON serialization/deserialization error
    #[error("{message}")]
    Serialization { message: String },
}

/// Configuration validation result
#[derive(Debug)]
pub struct ValidationResult {
    /// Whether configuration is valid
    pub is_valid: bool,
    /// Validation errors
    pub errors: Vec<ConfigError>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn into_result(self) -> Result<Vec<String>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.warnings),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 18.0,
            interval_sec: 2.0,
            loop_route: false,
            no_fix: false,
        }
    }
}

impl SimulationConfig {
    /// Effective speed in m/s; speeds below 1 km/h are raised to 1 km/h
    pub fn speed_ms(&self) -> f64 {
        self.speed_kmh.max(1.0) * METERS_PER_KM / SECONDS_PER_HOUR
    }

    /// Effective tick interval in seconds, at least one second
    pub fn tick_interval_s(&self) -> f64 {
        self.interval_sec.max(1.0)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(self.tick_interval_s())
    }

    /// Travel distance covered by one tick (metres)
    pub fn distance_per_tick_m(&self) -> f64 {
        self.speed_ms() * self.tick_interval_s()
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            entity_id: DEFAULT_ENTITY_ID.to_string(),
            collection: "boats".to_string(),
            auth: None,
            request_timeout_ms: 5000,
        }
    }
}

impl SinkConfig {
    /// Entity identifier, falling back to the default when blank
    pub fn effective_entity_id(&self) -> &str {
        match self.entity_id.trim() {
            "" => DEFAULT_ENTITY_ID,
            id => id,
        }
    }

    /// Auth token, if one is set and non-blank
    pub fn effective_auth(&self) -> Option<&str> {
        self.auth.as_deref().map(str::trim).filter(|token| !token.is_empty())
    }
}

/// Loads, validates and saves the simulator configuration
pub struct ConfigurationManager {
    /// Current configuration
    config: SimulatorConfig,
    /// Configuration file path
    config_file_path: Option<PathBuf>,
    /// Whether configuration has been modified
    is_modified: bool,
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationManager {
    /// Create a configuration manager with default settings
    pub fn new() -> Self {
        Self {
            config: SimulatorConfig::default(),
            config_file_path: None,
            is_modified: false,
        }
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Replace the whole configuration after validation.
    /// Returns the validation warnings.
    pub fn update_config(&mut self, config: SimulatorConfig) -> Result<Vec<String>, ConfigError> {
        let warnings = Self::validate(&config).into_result()?;
        self.config = config;
        self.is_modified = true;
        Ok(warnings)
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<String>, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let config: SimulatorConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to parse config file '{}': {}", path.display(), e),
        })?;

        let warnings = Self::validate(&config).into_result()?;

        self.config = config;
        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        Ok(warnings)
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(&self.config).map_err(|e| ConfigError::Serialization {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| ConfigError::Io {
            message: format!("Failed to write config file '{}': {}", path.display(), e),
        })?;

        self.config_file_path = Some(path.to_path_buf());
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

    /// Set vehicle speed, returning the previous value
    pub fn set_speed_kmh(&mut self, speed_kmh: f64) -> Result<f64, ConfigError> {
        validate_speed(speed_kmh)?;
        let old = self.config.simulation.speed_kmh;
        self.config.simulation.speed_kmh = speed_kmh;
        self.is_modified = true;
        Ok(old)
    }

    /// Set tick interval, returning the previous value
    pub fn set_interval_sec(&mut self, interval_sec: f64) -> Result<f64, ConfigError> {
        validate_interval(interval_sec)?;
        let old = self.config.simulation.interval_sec;
        self.config.simulation.interval_sec = interval_sec;
        self.is_modified = true;
        Ok(old)
    }

    /// Enable or disable looping, returning the previous value
    pub fn set_loop_route(&mut self, loop_route: bool) -> bool {
        let old = self.config.simulation.loop_route;
        self.config.simulation.loop_route = loop_route;
        self.is_modified = true;
        old
    }

    /// Suppress or restore GPS fix reporting, returning the previous value
    pub fn set_no_fix(&mut self, no_fix: bool) -> bool {
        let old = self.config.simulation.no_fix;
        self.config.simulation.no_fix = no_fix;
        self.is_modified = true;
        old
    }

    /// Validate a full configuration
    pub fn validate(config: &SimulatorConfig) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(e) = validate_speed(config.simulation.speed_kmh) {
            errors.push(e);
        } else if config.simulation.speed_kmh < 1.0 {
            warnings.push("Speeds below 1 km/h are simulated as 1 km/h".to_string());
        }

        if let Err(e) = validate_interval(config.simulation.interval_sec) {
            errors.push(e);
        } else if config.simulation.interval_sec < 1.0 {
            warnings.push("Tick intervals below 1 s are simulated as 1 s".to_string());
        }

        let url = config.sink.database_url.trim();
        if url.is_empty() {
            warnings.push("No database URL configured; only dry runs are possible".to_string());
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(ConfigError::InvalidParameter {
                parameter: "sink.database_url".to_string(),
                value: url.to_string(),
                reason: "URL must use http or https".to_string(),
            });
        }

        if config.sink.collection.trim().is_empty() {
            errors.push(ConfigError::InvalidParameter {
                parameter: "sink.collection".to_string(),
                value: config.sink.collection.clone(),
                reason: "Collection name cannot be empty".to_string(),
            });
        }

        if config.sink.request_timeout_ms == 0 {
            errors.push(ConfigError::InvalidParameter {
                parameter: "sink.request_timeout_ms".to_string(),
                value: "0".to_string(),
                reason: "Request timeout must be positive".to_string(),
            });
        }

        for (index, waypoint) in config.route.iter().enumerate() {
            if !waypoint.is_valid() {
                errors.push(ConfigError::InvalidParameter {
                    parameter: format!("route[{}]", index),
                    value: format!("{}, {}", waypoint.latitude, waypoint.longitude),
                    reason: "Latitude must be within ±90 and longitude within ±180 degrees".to_string(),
                });
            }
        }

        if config.route.len() < 2 {
            warnings.push("Route has fewer than two waypoints and cannot be simulated yet".to_string());
        }

        ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

fn validate_speed(speed_kmh: f64) -> Result<(), ConfigError> {
    if !(speed_kmh > 0.0 && speed_kmh <= 500.0) {
        return Err(ConfigError::InvalidParameter {
            parameter: "simulation.speed_kmh".to_string(),
            value: speed_kmh.to_string(),
            reason: "Speed must be within (0, 500] km/h".to_string(),
        });
    }
    Ok(())
}

fn validate_interval(interval_sec: f64) -> Result<(), ConfigError> {
    if !(interval_sec > 0.0 && interval_sec <= 3600.0) {
        return Err(ConfigError::InvalidParameter {
            parameter: "simulation.interval_sec".to_string(),
            value: interval_sec.to_string(),
            reason: "Interval must be within (0, 3600] seconds".to_string(),
        });
    }
    Ok(())
}
