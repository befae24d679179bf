//! Port trait definitions
//!
//! These traits define the interfaces that adapters must implement.

pub mod source;

pub use source::{load_points, FetchOutcome, LoadedPoints, PointOrigin, PointSource};
