//! Export serializers
//!
//! Every function in this module is a pure transform from analytics values to
//! a text payload. Nothing here touches the filesystem or the network; callers
//! decide whether to write the payload to disk, offer it as a download or
//! return it as an HTTP body.

pub mod csv;
pub mod geojson;
pub mod kml;

pub use self::csv::{vehicle_counts_csv, CSV_HEADER};
pub use self::geojson::{
    export_heatmap_geojson, export_points_geojson, heatmap_to_feature_collection,
    points_to_feature_collection,
};
pub use self::kml::{export_kml, points_to_kml};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    Kml,
    Csv,
}

impl ExportFormat {
    /// MIME type for the payload
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "application/geo+json",
            ExportFormat::Kml => "application/vnd.google-earth.kml+xml",
            ExportFormat::Csv => "text/csv;charset=utf-8",
        }
    }

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::GeoJson => "geojson",
            ExportFormat::Kml => "kml",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Serialized export content with a suggested filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    /// Suggested download filename
    pub filename: String,

    /// Payload format
    pub format: ExportFormat,

    /// UTF-8 text content
    pub content: String,
}

impl ExportPayload {
    pub fn new(filename: impl Into<String>, format: ExportFormat, content: String) -> Self {
        Self {
            filename: filename.into(),
            format,
            content,
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}
