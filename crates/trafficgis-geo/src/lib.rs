//! trafficgis Geo - Spatial analytics over camera point sets
//!
//! This crate computes distance statistics, density heatmaps, proximity
//! clusters and geofence containment for the models in `trafficgis-core`.

pub mod cluster;
pub mod geofence;
pub mod heatmap;
pub mod spatial;
pub mod stats;

pub use cluster::{build_clusters, ClusterAggregator};
pub use geofence::{buffer_zones, count_contained, test_containment, GeofenceEngine};
pub use heatmap::{build_heatmap, HeatmapGridBuilder};
pub use spatial::{haversine_km, measure_distance, points_within_radius, DistanceMeasurement};
pub use stats::compute_spatial_stats;
