//! Dispersion statistics for a point set.
//!
//! The pairwise pass is O(n²) in the number of points. A few thousand
//! cameras are fine; much larger sets should be sampled by the caller.

use trafficgis_core::models::{PointSet, SpatialStatsResult, CLUSTERED_THRESHOLD_KM};

use crate::spatial::{bounding_box, centroid, haversine_km};

/// Mean great-circle distance over all unordered pairs, 0 when n <= 1
pub fn average_pairwise_distance_km(points: &PointSet) -> f64 {
    let records = points.as_slice();
    let n = records.len();
    if n < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            total += haversine_km(a.position(), b.position());
        }
    }

    let pairs = (n * (n - 1) / 2) as f64;
    total / pairs
}

/// Compute statistics, or `None` for an empty point set
pub fn compute_spatial_stats(points: &PointSet) -> Option<SpatialStatsResult> {
    let bounding_box = bounding_box(points)?;
    let centroid = centroid(points)?;
    let average = average_pairwise_distance_km(points);
    let clustered = points.len() > 1 && average < CLUSTERED_THRESHOLD_KM;

    tracing::debug!(
        points = points.len(),
        average_km = average,
        clustered,
        "Computed spatial statistics"
    );

    Some(SpatialStatsResult {
        total_points: points.len(),
        bounding_box,
        centroid,
        average_pairwise_distance_km: average,
        clustered,
    })
}
