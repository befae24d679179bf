//! Geofence containment and zone registry.
//!
//! Circle containment uses great-circle distance. Polygons and rectangles
//! are tested with even-odd ray casting in the planar (longitude, latitude)
//! plane, which is adequate for zones a few kilometers across. Points lying
//! exactly on a polygon edge may fall either way.

use chrono::Utc;

use trafficgis_core::models::{
    Circle, Coordinate, GeofenceShape, GeofenceZone, PointRecord, PointSet, ZoneId,
};
use trafficgis_core::{Result, TrafficGisError};

use crate::spatial::haversine_m;

/// Even-odd crossing test against a ring
///
/// The closing edge from the last vertex back to the first is always tested;
/// a repeated closing vertex adds a zero-length edge that never crosses.
fn ring_contains(ring: &[Coordinate], latitude: f64, longitude: f64) -> bool {
    let (x, y) = (longitude, latitude);
    let mut inside = false;

    for (start, end) in ring.iter().zip(ring.iter().cycle().skip(1)) {
        let (xi, yi) = (start.longitude(), start.latitude());
        let (xj, yj) = (end.longitude(), end.latitude());
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
    }

    inside
}

fn circle_contains(circle: &Circle, position: Coordinate) -> bool {
    haversine_m(circle.center(), position) <= circle.radius_meters()
}

/// Whether a position lies inside a shape
pub fn contains_position(shape: &GeofenceShape, position: Coordinate) -> bool {
    let (lat, lon) = (position.latitude(), position.longitude());
    match shape {
        GeofenceShape::Circle(circle) => circle_contains(circle, position),
        GeofenceShape::Polygon(polygon) => ring_contains(polygon.ring(), lat, lon),
        GeofenceShape::Rectangle(rect) => {
            rect.bounds_contain(lat, lon) && ring_contains(&rect.ring(), lat, lon)
        }
    }
}

/// Whether a point lies inside a shape; circle boundaries are inclusive
pub fn test_containment(point: &PointRecord, shape: &GeofenceShape) -> bool {
    contains_position(shape, point.position())
}

/// Number of points inside a shape
pub fn count_contained(points: &PointSet, shape: &GeofenceShape) -> usize {
    points.iter().filter(|p| test_containment(p, shape)).count()
}

/// One circular zone of `radius_km` around every point, keyed by point id
pub fn buffer_zones(points: &PointSet, radius_km: f64) -> Result<Vec<(String, GeofenceShape)>> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(TrafficGisError::InvalidParameter {
            name: "radius_km".to_string(),
            reason: format!("must be a positive number, got {}", radius_km),
        });
    }

    points
        .iter()
        .map(|p| {
            let circle = Circle::new(p.position(), radius_km * 1000.0)?;
            Ok((p.id().to_string(), GeofenceShape::Circle(circle)))
        })
        .collect()
}

/// Registry of user-drawn zones
///
/// Each zone stores the number of points it contained when it was created.
/// That count is not refreshed when the point set changes; call
/// [`GeofenceEngine::recount`] to update it. The engine expects a single
/// writer. Share it behind a `RwLock` if several tasks need access.
#[derive(Debug, Default)]
pub struct GeofenceEngine {
    zones: Vec<GeofenceZone>,
    created: usize,
}

impl GeofenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone and count the points it contains
    ///
    /// Unnamed zones are called "Zone N", where N counts every zone created
    /// by this engine, including removed ones.
    pub fn create_zone(
        &mut self,
        shape: GeofenceShape,
        name: Option<String>,
        points: &PointSet,
    ) -> GeofenceZone {
        self.created += 1;
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Zone {}", self.created));
        let contained_count = count_contained(points, &shape);

        let zone = GeofenceZone {
            id: ZoneId::new(),
            name,
            shape,
            contained_count,
            created_at: Utc::now(),
        };

        tracing::info!(
            zone_id = %zone.id,
            shape = %zone.shape.kind(),
            contained = contained_count,
            "Created geofence zone"
        );

        self.zones.push(zone.clone());
        zone
    }

    /// Remove a zone, returning it if it existed
    pub fn remove_zone(&mut self, id: ZoneId) -> Option<GeofenceZone> {
        let index = self.zones.iter().position(|z| z.id == id)?;
        let zone = self.zones.remove(index);
        tracing::info!(zone_id = %id, "Removed geofence zone");
        Some(zone)
    }

    /// Refresh a zone's count against the given points
    pub fn recount(&mut self, id: ZoneId, points: &PointSet) -> Result<usize> {
        let zone = self
            .zones
            .iter_mut()
            .find(|z| z.id == id)
            .ok_or_else(|| TrafficGisError::ZoneNotFound { id: id.to_string() })?;

        let previous = zone.contained_count;
        zone.contained_count = count_contained(points, &zone.shape);
        tracing::debug!(zone_id = %id, previous, current = zone.contained_count, "Recounted zone");
        Ok(zone.contained_count)
    }

    /// Zones in creation order
    pub fn zones(&self) -> &[GeofenceZone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&GeofenceZone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
