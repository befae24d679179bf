//! Derived analytics values: statistics, heatmap cells and clusters.
//!
//! All of these are recomputed per call and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Average pairwise distance below which a point set counts as clustered
pub const CLUSTERED_THRESHOLD_KM: f64 = 5.0;

/// Latitude/longitude extent of a point set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Degenerate box around a single position
    pub fn from_point(latitude: f64, longitude: f64) -> Self {
        Self {
            min_lat: latitude,
            max_lat: latitude,
            min_lon: longitude,
            max_lon: longitude,
        }
    }

    /// Grow the box to include a position
    pub fn extend(&mut self, latitude: f64, longitude: f64) {
        self.min_lat = self.min_lat.min(latitude);
        self.max_lat = self.max_lat.max(latitude);
        self.min_lon = self.min_lon.min(longitude);
        self.max_lon = self.max_lon.max(longitude);
    }

    /// Inclusive containment test
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}

/// Dispersion statistics for a non-empty point set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialStatsResult {
    pub total_points: usize,
    pub bounding_box: BoundingBox,
    /// Planar mean position as `(latitude, longitude)`
    pub centroid: (f64, f64),
    pub average_pairwise_distance_km: f64,
    /// `average_pairwise_distance_km < 5.0`; false when no pairs exist
    pub clustered: bool,
}

/// One occupied bin of a heatmap grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Mean member density in [0, 1]
    pub intensity: f64,
    pub member_count: usize,
}

/// A group of nearby points rendered as one marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub centroid_lat: f64,
    pub centroid_lon: f64,
    pub member_count: usize,
    pub member_ids: BTreeSet<String>,
}

impl Cluster {
    /// Rendering tier under the given thresholds
    pub fn tier(&self, thresholds: &TierThresholds) -> ClusterTier {
        ClusterTier::classify(self.member_count, thresholds)
    }
}

/// Member-count boundaries for cluster tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Counts above this are at least medium
    pub medium: usize,
    /// Counts above this are large
    pub large: usize,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            medium: 10,
            large: 100,
        }
    }
}

/// Marker size class for a cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterTier {
    Small,
    Medium,
    Large,
}

impl ClusterTier {
    pub fn classify(member_count: usize, thresholds: &TierThresholds) -> Self {
        if member_count > thresholds.large {
            ClusterTier::Large
        } else if member_count > thresholds.medium {
            ClusterTier::Medium
        } else {
            ClusterTier::Small
        }
    }

    /// CSS class suffix used by map markers
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterTier::Small => "small",
            ClusterTier::Medium => "medium",
            ClusterTier::Large => "large",
        }
    }
}

/// Traffic density band of a single camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityLevel {
    Low,
    Medium,
    High,
}

impl DensityLevel {
    /// Classify a density; absent densities are treated as 0
    pub fn from_density(density: Option<f64>) -> Self {
        let value = density.unwrap_or(0.0);
        if value > 0.7 {
            DensityLevel::High
        } else if value > 0.4 {
            DensityLevel::Medium
        } else {
            DensityLevel::Low
        }
    }

    /// KML style id
    pub fn style_id(&self) -> &'static str {
        match self {
            DensityLevel::Low => "lowDensity",
            DensityLevel::Medium => "mediumDensity",
            DensityLevel::High => "highDensity",
        }
    }

    /// Marker fill color
    pub fn marker_color(&self) -> &'static str {
        match self {
            DensityLevel::Low => "#3b82f6",
            DensityLevel::Medium => "#f59e0b",
            DensityLevel::High => "#ef4444",
        }
    }
}
