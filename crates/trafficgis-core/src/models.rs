pub mod analytics;
pub mod geometry;
pub mod point;
pub mod vehicle;
pub mod zone;

pub use analytics::{
    BoundingBox, Cluster, ClusterTier, DensityLevel, HeatmapCell, SpatialStatsResult,
    TierThresholds, CLUSTERED_THRESHOLD_KM,
};
pub use geometry::{Circle, Coordinate, GeofenceShape, Polygon, Rectangle, ShapeKind};
pub use point::{PointRecord, PointSet, DEFAULT_AGGREGATE_DENSITY};
pub use vehicle::{totals, TimeSeriesEntry, VehicleCount};
pub use zone::{GeofenceZone, ZoneId};
