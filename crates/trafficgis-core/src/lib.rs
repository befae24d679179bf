//! trafficgis Core - Domain models, configuration and export formats
//!
//! This crate contains the validated point model, geofence shapes, analytics
//! result types, the data source port and the GeoJSON/KML/CSV serializers.
//! The algorithms that produce analytics live in `trafficgis-geo`.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod ports;
pub mod sample;

pub use error::{Result, TrafficGisError};
