//! Error types for trafficgis

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficGisError {
    // Point errors
    #[error("Invalid coordinate ({latitude}, {longitude}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Invalid traffic density {value} for point {id}: expected a value in [0, 1]")]
    InvalidDensity { id: String, value: f64 },

    #[error("Duplicate point id: {id}")]
    DuplicatePointId { id: String },

    // Geometry errors
    #[error("Invalid {shape} geometry: {reason}")]
    InvalidGeometry { shape: String, reason: String },

    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    // Geofence errors
    #[error("Geofence zone not found: {id}")]
    ZoneNotFound { id: String },

    // Data source errors
    #[error("Point source '{name}' unavailable: {reason}")]
    SourceUnavailable { name: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, TrafficGisError>;
