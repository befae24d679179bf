use crate::error::{Result, TrafficGisError};
use crate::models::TierThresholds;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Set explicitly by the embedding application
    Override,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Override => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered analytics configuration
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub heatmap_cell_km: ConfigValue<f64>,
    pub cluster_radius_m: ConfigValue<f64>,
    pub cluster_medium_threshold: ConfigValue<usize>,
    pub cluster_large_threshold: ConfigValue<usize>,
    pub kml_document_name: ConfigValue<String>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        let tiers = TierThresholds::default();
        Self {
            heatmap_cell_km: ConfigValue::new(1.0, ConfigSource::Default),
            cluster_radius_m: ConfigValue::new(500.0, ConfigSource::Default),
            cluster_medium_threshold: ConfigValue::new(tiers.medium, ConfigSource::Default),
            cluster_large_threshold: ConfigValue::new(tiers.large, ConfigSource::Default),
            kml_document_name: ConfigValue::new("Traffic Data".to_string(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| TrafficGisError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(cell_km) = file_config.heatmap_cell_km {
            self.heatmap_cell_km
                .update(parse_positive("heatmap_cell_km", cell_km)?, ConfigSource::File);
        }

        if let Some(radius_m) = file_config.cluster_radius_m {
            self.cluster_radius_m
                .update(parse_positive("cluster_radius_m", radius_m)?, ConfigSource::File);
        }

        if let Some(medium) = file_config.cluster_medium_threshold {
            self.cluster_medium_threshold.update(medium, ConfigSource::File);
        }

        if let Some(large) = file_config.cluster_large_threshold {
            self.cluster_large_threshold.update(large, ConfigSource::File);
        }

        if let Some(name) = file_config.kml_document_name {
            self.kml_document_name.update(name, ConfigSource::File);
        }

        self.validate()?;
        Ok(self)
    }

    /// Load configuration from environment variables
    ///
    /// Values that fail to parse are ignored with a warning. If the tier
    /// thresholds end up inverted, both revert to their previous values.
    pub fn load_from_env(mut self) -> Self {
        let medium_before = self.cluster_medium_threshold.clone();
        let large_before = self.cluster_large_threshold.clone();

        // TRAFFICGIS_HEATMAP_CELL_KM
        if let Ok(raw) = env::var("TRAFFICGIS_HEATMAP_CELL_KM") {
            match raw.parse::<f64>() {
                Ok(cell_km) if cell_km.is_finite() && cell_km > 0.0 => {
                    self.heatmap_cell_km.update(cell_km, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid TRAFFICGIS_HEATMAP_CELL_KM value '{}': expected positive kilometers",
                    raw
                ),
            }
        }

        // TRAFFICGIS_CLUSTER_RADIUS_M
        if let Ok(raw) = env::var("TRAFFICGIS_CLUSTER_RADIUS_M") {
            match raw.parse::<f64>() {
                Ok(radius) if radius.is_finite() && radius > 0.0 => {
                    self.cluster_radius_m.update(radius, ConfigSource::Environment)
                }
                _ => tracing::warn!(
                    "Invalid TRAFFICGIS_CLUSTER_RADIUS_M value '{}': expected positive meters",
                    raw
                ),
            }
        }

        // TRAFFICGIS_CLUSTER_MEDIUM
        if let Ok(raw) = env::var("TRAFFICGIS_CLUSTER_MEDIUM") {
            match raw.parse::<usize>() {
                Ok(medium) => {
                    self.cluster_medium_threshold.update(medium, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid TRAFFICGIS_CLUSTER_MEDIUM value '{}': expected a non-negative integer",
                    raw
                ),
            }
        }

        // TRAFFICGIS_CLUSTER_LARGE
        if let Ok(raw) = env::var("TRAFFICGIS_CLUSTER_LARGE") {
            match raw.parse::<usize>() {
                Ok(large) => self.cluster_large_threshold.update(large, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid TRAFFICGIS_CLUSTER_LARGE value '{}': expected a non-negative integer",
                    raw
                ),
            }
        }

        // TRAFFICGIS_KML_NAME
        if let Ok(name) = env::var("TRAFFICGIS_KML_NAME") {
            self.kml_document_name.update(name, ConfigSource::Environment);
        }

        if let Err(e) = self.validate() {
            tracing::warn!("Ignoring TRAFFICGIS_CLUSTER_MEDIUM/TRAFFICGIS_CLUSTER_LARGE: {}", e);
            self.cluster_medium_threshold = medium_before;
            self.cluster_large_threshold = large_before;
        }

        self
    }

    /// Apply explicit overrides from the embedding application
    ///
    /// Overrides are all-or-nothing: on error the configuration is unchanged.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<()> {
        let mut next = self.clone();

        if let Some(cell_km) = overrides.heatmap_cell_km {
            next.heatmap_cell_km
                .update(parse_positive("heatmap_cell_km", cell_km)?, ConfigSource::Override);
        }

        if let Some(radius_m) = overrides.cluster_radius_m {
            next.cluster_radius_m
                .update(parse_positive("cluster_radius_m", radius_m)?, ConfigSource::Override);
        }

        if let Some(medium) = overrides.cluster_medium_threshold {
            next.cluster_medium_threshold.update(medium, ConfigSource::Override);
        }

        if let Some(large) = overrides.cluster_large_threshold {
            next.cluster_large_threshold.update(large, ConfigSource::Override);
        }

        if let Some(name) = overrides.kml_document_name {
            next.kml_document_name.update(name, ConfigSource::Override);
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.cluster_medium_threshold.value > self.cluster_large_threshold.value {
            return Err(TrafficGisError::ConfigInvalid {
                key: "cluster_medium_threshold".to_string(),
                reason: format!(
                    "medium threshold {} exceeds large threshold {}",
                    self.cluster_medium_threshold.value, self.cluster_large_threshold.value
                ),
            });
        }
        Ok(())
    }

    /// Cluster tier boundaries
    pub fn tier_thresholds(&self) -> TierThresholds {
        TierThresholds {
            medium: self.cluster_medium_threshold.value,
            large: self.cluster_large_threshold.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "heatmap_cell_km".to_string(),
            (format!("{} km", self.heatmap_cell_km.value), self.heatmap_cell_km.source),
        );

        map.insert(
            "cluster_radius_m".to_string(),
            (format!("{} m", self.cluster_radius_m.value), self.cluster_radius_m.source),
        );

        map.insert(
            "cluster_medium_threshold".to_string(),
            (
                self.cluster_medium_threshold.value.to_string(),
                self.cluster_medium_threshold.source,
            ),
        );

        map.insert(
            "cluster_large_threshold".to_string(),
            (self.cluster_large_threshold.value.to_string(), self.cluster_large_threshold.source),
        );

        map.insert(
            "kml_document_name".to_string(),
            (self.kml_document_name.value.clone(), self.kml_document_name.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    heatmap_cell_km: Option<f64>,
    cluster_radius_m: Option<f64>,
    cluster_medium_threshold: Option<usize>,
    cluster_large_threshold: Option<usize>,
    kml_document_name: Option<String>,
}

/// Explicit configuration overrides
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub heatmap_cell_km: Option<f64>,
    pub cluster_radius_m: Option<f64>,
    pub cluster_medium_threshold: Option<usize>,
    pub cluster_large_threshold: Option<usize>,
    pub kml_document_name: Option<String>,
}

/// Validate a strictly positive, finite size
pub fn parse_positive(key: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TrafficGisError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Expected a positive number, got {}", value),
        })
    }
}
