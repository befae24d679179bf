//! Density heatmap over a fixed-size geographic grid.
//!
//! The grid origin is the south-west corner of the point set's bounding box.
//! Rows are `cell_size_km` of latitude tall; columns are `cell_size_km` wide
//! at the latitude of the point being binned, so cells stay roughly square
//! away from the equator. Only occupied cells are emitted.

use std::collections::BTreeMap;

use trafficgis_core::models::{HeatmapCell, PointSet};
use trafficgis_core::{Result, TrafficGisError};

use crate::spatial::{bounding_box, km_to_lat_degrees, km_to_lon_degrees};

pub const DEFAULT_CELL_SIZE_KM: f64 = 1.0;

/// Smallest accepted cell edge (1 mm); keeps grid indices far inside `i64`
pub const MIN_CELL_SIZE_KM: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapGridBuilder {
    cell_size_km: f64,
}

#[derive(Default)]
struct CellAccumulator {
    density_sum: f64,
    count: usize,
}

impl HeatmapGridBuilder {
    pub fn new(cell_size_km: f64) -> Result<Self> {
        if !cell_size_km.is_finite() || cell_size_km < MIN_CELL_SIZE_KM {
            return Err(TrafficGisError::InvalidParameter {
                name: "cell_size_km".to_string(),
                reason: format!(
                    "must be a number of kilometers no smaller than {}, got {}",
                    MIN_CELL_SIZE_KM, cell_size_km
                ),
            });
        }
        Ok(Self { cell_size_km })
    }

    pub fn cell_size_km(&self) -> f64 {
        self.cell_size_km
    }

    /// Bin points into occupied cells ordered by (row, column)
    ///
    /// Intensity is the mean member density, with absent densities counted
    /// at the point model's aggregate default.
    pub fn build(&self, points: &PointSet) -> Vec<HeatmapCell> {
        let Some(bbox) = bounding_box(points) else {
            return Vec::new();
        };

        let lat_step = km_to_lat_degrees(self.cell_size_km);
        let mut cells: BTreeMap<(i64, i64), CellAccumulator> = BTreeMap::new();

        for point in points {
            let lon_step = km_to_lon_degrees(self.cell_size_km, point.latitude());
            let row = ((point.latitude() - bbox.min_lat) / lat_step).floor() as i64;
            let col = ((point.longitude() - bbox.min_lon) / lon_step).floor() as i64;

            let cell = cells.entry((row, col)).or_default();
            cell.density_sum += point.density_or_default();
            cell.count += 1;
        }

        let heatmap: Vec<HeatmapCell> = cells
            .into_iter()
            .map(|((row, col), acc)| {
                let center_lat =
                    (bbox.min_lat + (row as f64 + 0.5) * lat_step).clamp(-90.0, 90.0);
                let lon_step = km_to_lon_degrees(self.cell_size_km, center_lat);
                let center_lon =
                    (bbox.min_lon + (col as f64 + 0.5) * lon_step).clamp(-180.0, 180.0);

                HeatmapCell {
                    center_lat,
                    center_lon,
                    intensity: acc.density_sum / acc.count as f64,
                    member_count: acc.count,
                }
            })
            .collect();

        tracing::debug!(
            points = points.len(),
            cells = heatmap.len(),
            cell_size_km = self.cell_size_km,
            "Built heatmap grid"
        );

        heatmap
    }
}

impl Default for HeatmapGridBuilder {
    fn default() -> Self {
        Self {
            cell_size_km: DEFAULT_CELL_SIZE_KM,
        }
    }
}

/// Convenience wrapper around [`HeatmapGridBuilder`]
pub fn build_heatmap(points: &PointSet, cell_size_km: f64) -> Result<Vec<HeatmapCell>> {
    Ok(HeatmapGridBuilder::new(cell_size_km)?.build(points))
}
