//! Fixed demonstration dataset: eight traffic cameras around Delhi.

use crate::models::{PointRecord, PointSet};
use crate::ports::{FetchOutcome, PointSource};

/// `(camera id, latitude, longitude, traffic density)`
const SAMPLE_CAMERAS: [(&str, f64, f64, f64); 8] = [
    ("CAM001", 28.6139, 77.2090, 0.35),
    ("CAM002", 28.6289, 77.2196, 0.72),
    ("CAM003", 28.5355, 77.3910, 0.45),
    ("CAM004", 28.7041, 77.1025, 0.88),
    ("CAM005", 28.5494, 77.2501, 0.25),
    ("CAM006", 28.6289, 77.2065, 0.55),
    ("CAM007", 28.6448, 77.2167, 0.68),
    ("CAM008", 28.6139, 77.2300, 0.42),
];

/// The sample cameras as a point set
pub fn sample_cameras() -> PointSet {
    let records = SAMPLE_CAMERAS
        .iter()
        .map(|(id, lat, lon, density)| PointRecord::from_validated(id, *lat, *lon, Some(*density)))
        .collect();
    PointSet::from_validated(records)
}

/// Point source that always yields the sample cameras
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl PointSource for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    fn fetch(&self) -> FetchOutcome {
        FetchOutcome::Fetched(sample_cameras())
    }
}
