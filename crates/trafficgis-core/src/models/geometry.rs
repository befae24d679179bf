//! Coordinates and geofence shapes.
//!
//! Every constructor here validates its input, so a value of any of these
//! types is always well-formed: coordinates lie in the WGS84 degree ranges,
//! circle radii are positive and rings have at least three distinct vertices.

use serde::Serialize;
use std::fmt;

use crate::error::{Result, TrafficGisError};

/// A validated WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside [-90, 90] x [-180, 180]
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(TrafficGisError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from components already known to be in range
    pub(crate) fn from_validated(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Position as `[longitude, latitude]` (GeoJSON axis order)
    pub fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Shape discriminant, used in messages and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Polygon,
    Rectangle,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
        };
        f.write_str(name)
    }
}

fn invalid(kind: ShapeKind, reason: impl Into<String>) -> TrafficGisError {
    TrafficGisError::InvalidGeometry {
        shape: kind.to_string(),
        reason: reason.into(),
    }
}

/// Circle given by a center and a radius in meters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    center: Coordinate,
    radius_meters: f64,
}

impl Circle {
    pub fn new(center: Coordinate, radius_meters: f64) -> Result<Self> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(invalid(
                ShapeKind::Circle,
                format!("radius must be positive, got {}", radius_meters),
            ));
        }
        Ok(Self {
            center,
            radius_meters,
        })
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }
}

/// Implicitly closed polygon ring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    ring: Vec<Coordinate>,
}

impl Polygon {
    /// Create a polygon from its vertices
    ///
    /// Consecutive duplicate vertices and an explicit closing vertex are
    /// dropped; at least three vertices must remain.
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self> {
        let mut ring: Vec<Coordinate> = Vec::with_capacity(vertices.len());
        for vertex in vertices {
            if ring.last() != Some(&vertex) {
                ring.push(vertex);
            }
        }
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        if ring.len() < 3 {
            return Err(invalid(
                ShapeKind::Polygon,
                format!("ring needs at least 3 distinct vertices, found {}", ring.len()),
            ));
        }
        Ok(Self { ring })
    }

    /// Create a polygon from `[longitude, latitude]` pairs
    pub fn from_lon_lat(pairs: &[[f64; 2]]) -> Result<Self> {
        let vertices = pairs
            .iter()
            .map(|[lon, lat]| Coordinate::new(*lat, *lon))
            .collect::<Result<Vec<_>>>()?;
        Self::new(vertices)
    }

    pub fn ring(&self) -> &[Coordinate] {
        &self.ring
    }
}

/// Axis-aligned rectangle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rectangle {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl Rectangle {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self> {
        Coordinate::new(south, west)?;
        Coordinate::new(north, east)?;

        if south >= north {
            return Err(invalid(
                ShapeKind::Rectangle,
                format!("south edge {} must be below north edge {}", south, north),
            ));
        }
        if west >= east {
            return Err(invalid(
                ShapeKind::Rectangle,
                format!("west edge {} must be left of east edge {}", west, east),
            ));
        }
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    /// Corner ring: south-west, north-west, north-east, south-east
    pub fn ring(&self) -> [Coordinate; 4] {
        [
            Coordinate::from_validated(self.south, self.west),
            Coordinate::from_validated(self.north, self.west),
            Coordinate::from_validated(self.north, self.east),
            Coordinate::from_validated(self.south, self.east),
        ]
    }

    /// Inclusive bounds test
    pub fn bounds_contain(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }
}

/// A geofence boundary
///
/// The set of shapes is closed; containment dispatches on the variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeofenceShape {
    Circle(Circle),
    Polygon(Polygon),
    Rectangle(Rectangle),
}

impl GeofenceShape {
    /// Circle shape from raw center degrees and radius
    pub fn circle(latitude: f64, longitude: f64, radius_meters: f64) -> Result<Self> {
        let center = Coordinate::new(latitude, longitude)?;
        Ok(GeofenceShape::Circle(Circle::new(center, radius_meters)?))
    }

    /// Polygon shape from `[longitude, latitude]` pairs
    pub fn polygon(pairs: &[[f64; 2]]) -> Result<Self> {
        Ok(GeofenceShape::Polygon(Polygon::from_lon_lat(pairs)?))
    }

    pub fn rectangle(south: f64, west: f64, north: f64, east: f64) -> Result<Self> {
        Ok(GeofenceShape::Rectangle(Rectangle::new(south, west, north, east)?))
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            GeofenceShape::Circle(_) => ShapeKind::Circle,
            GeofenceShape::Polygon(_) => ShapeKind::Polygon,
            GeofenceShape::Rectangle(_) => ShapeKind::Rectangle,
        }
    }
}
