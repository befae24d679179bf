use crate::error::{Result, TrafficGisError};
use crate::models::PointSet;

/// Result of asking a source for its current points
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The source produced a validated point set
    Fetched(PointSet),
    /// The source could not produce data
    Failed { reason: String },
}

/// Port for anything that can supply camera locations
///
/// Transport, retries and timeouts live in the implementation; the
/// analytics code only ever sees the outcome.
pub trait PointSource {
    /// Human-readable source name used in logs and errors
    fn name(&self) -> &str;

    /// Fetch the current point set
    fn fetch(&self) -> FetchOutcome;
}

/// Where a loaded point set came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointOrigin {
    Primary,
    Fallback { reason: String },
}

/// Points together with their provenance
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPoints {
    pub points: PointSet,
    pub origin: PointOrigin,
}

impl LoadedPoints {
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, PointOrigin::Fallback { .. })
    }
}

/// Load points from `primary`, falling back to `fallback` when it fails
///
/// Returns `SourceUnavailable` only when both sources fail.
pub fn load_points(primary: &dyn PointSource, fallback: &dyn PointSource) -> Result<LoadedPoints> {
    let reason = match primary.fetch() {
        FetchOutcome::Fetched(points) => {
            tracing::debug!(source = primary.name(), points = points.len(), "Loaded points");
            return Ok(LoadedPoints {
                points,
                origin: PointOrigin::Primary,
            });
        }
        FetchOutcome::Failed { reason } => reason,
    };

    tracing::warn!(
        "Point source '{}' unavailable ({}), using '{}'",
        primary.name(),
        reason,
        fallback.name()
    );

    match fallback.fetch() {
        FetchOutcome::Fetched(points) => Ok(LoadedPoints {
            points,
            origin: PointOrigin::Fallback { reason },
        }),
        FetchOutcome::Failed {
            reason: fallback_reason,
        } => Err(TrafficGisError::SourceUnavailable {
            name: fallback.name().to_string(),
            reason: format!(
                "{} (primary '{}' failed: {})",
                fallback_reason,
                primary.name(),
                reason
            ),
        }),
    }
}
