//! GeoJSON export (RFC 7946)
//!
//! Coordinates are always written as `[longitude, latitude]`.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::formats::{ExportFormat, ExportPayload};
use crate::models::{HeatmapCell, PointSet};

pub const POINTS_FILENAME: &str = "traffic_cameras.geojson";
pub const HEATMAP_FILENAME: &str = "traffic_heatmap.geojson";

/// Build a Point feature at `[longitude, latitude]`
fn point_feature(longitude: f64, latitude: f64, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![longitude, latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Camera locations as a FeatureCollection
///
/// Each feature carries `cameraId` and `trafficDensity` (0 when the camera
/// reports no density). Feature order follows the point set.
pub fn points_to_feature_collection(points: &PointSet) -> FeatureCollection {
    let features = points
        .iter()
        .map(|point| {
            let mut properties = JsonObject::new();
            properties.insert("cameraId".to_string(), json!(point.id()));
            properties.insert("trafficDensity".to_string(), json!(point.density().unwrap_or(0.0)));
            point_feature(point.longitude(), point.latitude(), properties)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Heatmap cells as a FeatureCollection
///
/// Each feature carries the cell `intensity` and its positional `pointId`.
pub fn heatmap_to_feature_collection(cells: &[HeatmapCell]) -> FeatureCollection {
    let features = cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let mut properties = JsonObject::new();
            properties.insert("intensity".to_string(), json!(cell.intensity));
            properties.insert("pointId".to_string(), json!(index));
            point_feature(cell.center_lon, cell.center_lat, properties)
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Pretty-print with two-space indentation
fn to_pretty_string(collection: &FeatureCollection) -> String {
    format!("{:#}", serde_json::Value::Object(JsonObject::from(collection)))
}

/// Camera GeoJSON export payload
pub fn export_points_geojson(points: &PointSet) -> ExportPayload {
    let collection = points_to_feature_collection(points);
    tracing::debug!(features = collection.features.len(), "Serialized camera GeoJSON");
    ExportPayload::new(POINTS_FILENAME, ExportFormat::GeoJson, to_pretty_string(&collection))
}

/// Heatmap GeoJSON export payload
pub fn export_heatmap_geojson(cells: &[HeatmapCell]) -> ExportPayload {
    let collection = heatmap_to_feature_collection(cells);
    tracing::debug!(features = collection.features.len(), "Serialized heatmap GeoJSON");
    ExportPayload::new(HEATMAP_FILENAME, ExportFormat::GeoJson, to_pretty_string(&collection))
}
