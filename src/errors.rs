use thiserror::Error;
use crate::messages::SensorType;

/// Errors returned by the sensor manager
#[derive(Error, Debug)]
pub enum SensorError {
    #[error("cannot enable; {sensor} sensor is already enabled")]
    AlreadyEnabled { sensor: SensorType },

    #[error("cannot disable; {sensor} sensor is not enabled")]
    NotEnabled { sensor: SensorType },

    #[error("unknown sensor type: {name}")]
    UnknownSensor { name: String },

    #[error("sensor manager is not initialized")]
    NotInitialized,

    #[error("sensor manager is closed")]
    Closed,

    #[error("native capture failed: {0}")]
    Capture(#[from] CaptureError),
}

/// Failures reported by a native motion-capture backend
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to create capture handle: {reason}")]
    HandleCreation { reason: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from '{path}': {source}")]
    LoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    FormatError(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type aliases for convenience
pub type SensorResult<T> = Result<T, SensorError>;
pub type CaptureResult<T> = Result<T, CaptureError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
