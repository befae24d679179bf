use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use super::geometry::GeofenceShape;

/// Unique identifier for a geofence zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ZoneId(pub Uuid);

impl ZoneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geofence-{}", self.0.simple())
    }
}

/// A named geofence and its cached containment count
///
/// `contained_count` is a snapshot taken when the zone was created or last
/// recounted. It does not follow later changes to the point set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeofenceZone {
    /// Unique identifier
    pub id: ZoneId,

    /// Display name
    pub name: String,

    /// Zone boundary
    pub shape: GeofenceShape,

    /// Points inside the shape at the last count
    pub contained_count: usize,

    /// When the zone was created
    pub created_at: DateTime<Utc>,
}
