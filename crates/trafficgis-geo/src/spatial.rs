use geo::{Distance, Haversine, Point};
use serde::Serialize;
use std::f64::consts::PI;

use trafficgis_core::models::{BoundingBox, Coordinate, PointRecord, PointSet};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Length of one degree of latitude (and of longitude at the equator)
pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * PI / 180.0;

pub const MILES_PER_KM: f64 = 0.621371;

fn to_point(coord: Coordinate) -> Point {
    Point::new(coord.longitude(), coord.latitude())
}

/// Great-circle distance in meters
pub fn haversine_m(a: Coordinate, b: Coordinate) -> f64 {
    Haversine.distance(to_point(a), to_point(b))
}

/// Great-circle distance in kilometers
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    haversine_m(a, b) / 1000.0
}

/// Degrees of longitude spanning `km` at the given latitude
///
/// Equirectangular approximation; the cosine is clamped so the result stays
/// finite at the poles.
pub fn km_to_lon_degrees(km: f64, latitude: f64) -> f64 {
    let cos_lat = latitude.to_radians().cos().max(f64::EPSILON);
    km / (KM_PER_DEGREE * cos_lat)
}

/// Degrees of latitude spanning `km`
pub fn km_to_lat_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

/// Min/max latitude and longitude, or `None` for an empty set
pub fn bounding_box(points: &PointSet) -> Option<BoundingBox> {
    let mut iter = points.iter();
    let first = iter.next()?;
    let mut bbox = BoundingBox::from_point(first.latitude(), first.longitude());
    for point in iter {
        bbox.extend(point.latitude(), point.longitude());
    }
    Some(bbox)
}

/// Arithmetic mean `(latitude, longitude)`, or `None` for an empty set
///
/// This is a planar average, not a spherical centroid. It is accurate
/// enough for city-scale extents away from the antimeridian.
pub fn centroid(points: &PointSet) -> Option<(f64, f64)> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat_sum, lon_sum) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.latitude(), lon + p.longitude()));
    Some((lat_sum / n, lon_sum / n))
}

/// Points within `radius_km` of `center`, boundary inclusive, in input order
pub fn points_within_radius(
    points: &PointSet,
    center: Coordinate,
    radius_km: f64,
) -> Vec<&PointRecord> {
    points.iter().filter(|p| haversine_km(center, p.position()) <= radius_km).collect()
}

/// A measured distance in both unit systems
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceMeasurement {
    pub kilometers: f64,
    pub miles: f64,
}

/// Measure the great-circle distance between two positions
pub fn measure_distance(from: Coordinate, to: Coordinate) -> DistanceMeasurement {
    let kilometers = haversine_km(from, to);
    DistanceMeasurement {
        kilometers,
        miles: kilometers * MILES_PER_KM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_haversine_accuracy() {
        // Paris to London is roughly 344 km
        let paris = coord(48.8566, 2.3522);
        let london = coord(51.5074, -0.1276);
        let distance = haversine_km(paris, london);
        assert!(
            distance > 339.0 && distance < 349.0,
            "Paris-London distance {} should be ~344km",
            distance
        );
    }

    #[test]
    fn test_haversine_same_point() {
        let p = coord(28.6139, 77.2090);
        assert!(haversine_m(p, p) < 0.001);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_km(coord(10.0, 30.0), coord(11.0, 30.0));
        assert!((d - KM_PER_DEGREE).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_lon_degrees_widen_with_latitude() {
        let equator = km_to_lon_degrees(1.0, 0.0);
        let north = km_to_lon_degrees(1.0, 60.0);
        assert!((north / equator - 2.0).abs() < 1e-9);
        assert!(km_to_lon_degrees(1.0, 90.0).is_finite());
    }

    #[test]
    fn test_bounding_box_and_centroid() {
        let points = PointSet::new(vec![
            PointRecord::new("A", 0.0, 0.0, None).unwrap(),
            PointRecord::new("B", 2.0, 4.0, None).unwrap(),
        ])
        .unwrap();

        let bbox = bounding_box(&points).unwrap();
        assert_eq!((bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon), (0.0, 2.0, 0.0, 4.0));
        assert_eq!(centroid(&points), Some((1.0, 2.0)));

        assert!(bounding_box(&PointSet::empty()).is_none());
        assert!(centroid(&PointSet::empty()).is_none());
    }

    #[test]
    fn test_points_within_radius() {
        let points = PointSet::new(vec![
            PointRecord::new("NEAR", 28.6139, 77.2090, None).unwrap(),
            PointRecord::new("FAR", 28.7041, 77.1025, None).unwrap(),
        ])
        .unwrap();

        let center = coord(28.6150, 77.2100);
        let nearby = points_within_radius(&points, center, 2.0);
        assert_eq!(nearby.len(), 1);
        assert_eq!(nearby[0].id(), "NEAR");
    }

    #[test]
    fn test_measure_distance_miles() {
        let m = measure_distance(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((m.miles - m.kilometers * 0.621371).abs() < 1e-12);
    }
}
