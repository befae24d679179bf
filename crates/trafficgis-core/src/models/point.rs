//! Camera location records and validated point sets.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::geometry::Coordinate;
use crate::error::{Result, TrafficGisError};

/// Density used for aggregation when a camera reports none
pub const DEFAULT_AGGREGATE_DENSITY: f64 = 0.5;

/// A single geolocated camera record
///
/// Records are validated on construction and immutable afterwards, so
/// algorithms downstream never re-check coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPointRecord")]
pub struct PointRecord {
    #[serde(rename = "cameraId")]
    id: String,
    latitude: f64,
    longitude: f64,
    #[serde(rename = "trafficDensity", skip_serializing_if = "Option::is_none")]
    density: Option<f64>,
}

impl PointRecord {
    /// Create a new point record
    ///
    /// Fails with `InvalidCoordinate` when latitude or longitude fall outside
    /// the WGS84 degree ranges and with `InvalidDensity` when the density is
    /// outside `[0, 1]`.
    pub fn new(
        id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        density: Option<f64>,
    ) -> Result<Self> {
        let id = id.into();
        let position = Coordinate::new(latitude, longitude)?;

        if let Some(value) = density {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(TrafficGisError::InvalidDensity { id, value });
            }
        }

        Ok(Self {
            id,
            latitude: position.latitude(),
            longitude: position.longitude(),
            density,
        })
    }

    /// Build from literal values already known to be valid
    pub(crate) fn from_validated(
        id: &str,
        latitude: f64,
        longitude: f64,
        density: Option<f64>,
    ) -> Self {
        Self {
            id: id.to_string(),
            latitude,
            longitude,
            density,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Reported traffic density, if any
    pub fn density(&self) -> Option<f64> {
        self.density
    }

    /// Density with the aggregation default applied
    pub fn density_or_default(&self) -> f64 {
        self.density.unwrap_or(DEFAULT_AGGREGATE_DENSITY)
    }

    pub fn position(&self) -> Coordinate {
        Coordinate::from_validated(self.latitude, self.longitude)
    }
}

/// Wire representation of a camera record before validation
#[derive(Debug, Deserialize)]
struct RawPointRecord {
    #[serde(rename = "cameraId", alias = "id")]
    id: String,
    latitude: f64,
    longitude: f64,
    #[serde(rename = "trafficDensity", alias = "density", default)]
    density: Option<f64>,
}

impl TryFrom<RawPointRecord> for PointRecord {
    type Error = TrafficGisError;

    fn try_from(raw: RawPointRecord) -> Result<Self> {
        PointRecord::new(raw.id, raw.latitude, raw.longitude, raw.density)
    }
}

/// Immutable collection of point records with unique ids
///
/// Insertion order is preserved for exports; no computation depends on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PointRecord>", into = "Vec<PointRecord>")]
pub struct PointSet {
    records: Vec<PointRecord>,
}

impl PointSet {
    /// Create a point set, rejecting duplicate ids
    pub fn new(records: Vec<PointRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id()) {
                return Err(TrafficGisError::DuplicatePointId {
                    id: record.id().to_string(),
                });
            }
        }

        Ok(Self { records })
    }

    /// Wrap records whose ids are known to be unique
    pub(crate) fn from_validated(records: Vec<PointRecord>) -> Self {
        Self { records }
    }

    /// Create an empty point set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the upstream map payload
    ///
    /// Accepts either `{"cameras": [...]}` or a bare array of camera objects.
    /// Each record is validated exactly as [`PointRecord::new`] does.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| TrafficGisError::Serialization(format!("Failed to parse JSON: {}", e)))?;

        let cameras = match value {
            serde_json::Value::Array(items) => serde_json::Value::Array(items),
            serde_json::Value::Object(mut map) => map.remove("cameras").ok_or_else(|| {
                TrafficGisError::Serialization("Payload has no 'cameras' array".to_string())
            })?,
            other => {
                return Err(TrafficGisError::Serialization(format!(
                    "Expected an object or array, found {}",
                    other
                )))
            }
        };

        let raw: Vec<RawPointRecord> = serde_json::from_value(cameras).map_err(|e| {
            TrafficGisError::Serialization(format!("Malformed camera record: {}", e))
        })?;

        let records = raw.into_iter().map(PointRecord::try_from).collect::<Result<Vec<_>>>()?;
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PointRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[PointRecord] {
        &self.records
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&PointRecord> {
        self.records.iter().find(|r| r.id() == id)
    }
}

impl TryFrom<Vec<PointRecord>> for PointSet {
    type Error = TrafficGisError;

    fn try_from(records: Vec<PointRecord>) -> Result<Self> {
        PointSet::new(records)
    }
}

impl From<PointSet> for Vec<PointRecord> {
    fn from(set: PointSet) -> Self {
        set.records
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a PointRecord;
    type IntoIter = std::slice::Iter<'a, PointRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
