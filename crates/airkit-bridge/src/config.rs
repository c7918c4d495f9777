//! Bridge configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use airkit_core::BridgeConfig;

/// Bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sensor feed settings.
    pub sensor: SensorConfig,
    /// Accessory transport settings.
    pub accessory: AccessoryConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Sensor host is not empty and carries a scheme
    /// - Sensor port and poll interval are non-zero
    /// - Accessory bind address is valid (host:port format)
    /// - Accessory name is not empty
    ///
    /// # Example
    ///
    /// ```
    /// use airkit_bridge::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.sensor.validate());
        errors.extend(self.accessory.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// The immutable pipeline configuration handed to the bridge loop.
    #[must_use]
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            host: self.sensor.host.clone(),
            port: self.sensor.port,
            interval: Duration::from_secs(self.sensor.poll_interval),
            development: self.sensor.development,
        }
    }
}

/// Sensor feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Sensor host including scheme, e.g. `http://0.0.0.0`.
    pub host: String,
    /// Sensor port.
    pub port: u16,
    /// Seconds between sensor readings.
    pub poll_interval: u64,
    /// Development mode: substitute random temperature readings.
    pub development: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            host: "http://0.0.0.0".to_string(),
            port: 1006,
            poll_interval: 5,
            development: false,
        }
    }
}

impl SensorConfig {
    /// Validate sensor configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.host.is_empty() {
            errors.push(ValidationError {
                field: "sensor.host".to_string(),
                message: "host cannot be empty".to_string(),
            });
        } else if !self.host.contains("://") {
            errors.push(ValidationError {
                field: "sensor.host".to_string(),
                message: format!(
                    "host '{}' must include a scheme, e.g. http://0.0.0.0",
                    self.host
                ),
            });
        }

        if self.port == 0 {
            errors.push(ValidationError {
                field: "sensor.port".to_string(),
                message: "port cannot be 0".to_string(),
            });
        }

        if self.poll_interval == 0 {
            errors.push(ValidationError {
                field: "sensor.poll_interval".to_string(),
                message: "poll interval cannot be 0 seconds".to_string(),
            });
        }

        errors
    }
}

/// Accessory transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessoryConfig {
    /// Bind address for the transport (e.g., "127.0.0.1:51826").
    pub bind: String,
    /// Accessory display name.
    pub name: String,
    /// Accessory serial number.
    pub serial: String,
    /// Accessory manufacturer.
    pub manufacturer: String,
    /// Accessory model.
    pub model: String,
}

impl Default for AccessoryConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:51826".to_string(),
            name: "SCD-41".to_string(),
            serial: "ADAFRUIT-5190-SCD-41".to_string(),
            manufacturer: "Adafruit".to_string(),
            model: "SCD-41".to_string(),
        }
    }
}

impl AccessoryConfig {
    /// Validate accessory configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.bind.is_empty() {
            errors.push(ValidationError {
                field: "accessory.bind".to_string(),
                message: "bind address cannot be empty".to_string(),
            });
        } else {
            let parts: Vec<&str> = self.bind.rsplitn(2, ':').collect();
            if parts.len() != 2 {
                errors.push(ValidationError {
                    field: "accessory.bind".to_string(),
                    message: format!(
                        "invalid bind address '{}': expected format 'host:port'",
                        self.bind
                    ),
                });
            } else {
                match parts[0].parse::<u16>() {
                    Ok(0) => {
                        errors.push(ValidationError {
                            field: "accessory.bind".to_string(),
                            message: "port cannot be 0".to_string(),
                        });
                    }
                    Err(_) => {
                        errors.push(ValidationError {
                            field: "accessory.bind".to_string(),
                            message: format!(
                                "invalid port '{}': must be a number 1-65535",
                                parts[0]
                            ),
                        });
                    }
                    Ok(_) => {}
                }
            }
        }

        if self.name.is_empty() {
            errors.push(ValidationError {
                field: "accessory.name".to_string(),
                message: "accessory name cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `sensor.host`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("airkit")
        .join("bridge.toml")
}
