//! Vehicle counts reported per camera over time.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Vehicle counts by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleCount {
    pub motorcycle: u64,
    pub car: u64,
    pub bus: u64,
    pub truck: u64,
}

impl VehicleCount {
    pub fn new(motorcycle: u64, car: u64, bus: u64, truck: u64) -> Self {
        Self {
            motorcycle,
            car,
            bus,
            truck,
        }
    }

    /// Sum over all four categories
    pub fn total(&self) -> u64 {
        self.motorcycle + self.car + self.bus + self.truck
    }
}

impl Add for VehicleCount {
    type Output = VehicleCount;

    fn add(self, rhs: VehicleCount) -> VehicleCount {
        VehicleCount {
            motorcycle: self.motorcycle + rhs.motorcycle,
            car: self.car + rhs.car,
            bus: self.bus + rhs.bus,
            truck: self.truck + rhs.truck,
        }
    }
}

impl AddAssign for VehicleCount {
    fn add_assign(&mut self, rhs: VehicleCount) {
        *self = *self + rhs;
    }
}

/// Counts observed at one timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesEntry {
    /// Timestamp as reported upstream, written to exports verbatim
    pub timestamp: String,
    pub counts: VehicleCount,
}

impl TimeSeriesEntry {
    pub fn new(timestamp: impl Into<String>, counts: VehicleCount) -> Self {
        Self {
            timestamp: timestamp.into(),
            counts,
        }
    }
}

/// Per-category totals over a whole series
pub fn totals(series: &[TimeSeriesEntry]) -> VehicleCount {
    series.iter().fold(VehicleCount::default(), |acc, entry| acc + entry.counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        assert_eq!(VehicleCount::new(1, 2, 3, 4).total(), 10);
        assert_eq!(VehicleCount::default().total(), 0);
    }

    #[test]
    fn test_series_totals() {
        let series = vec![
            TimeSeriesEntry::new("2024-01-01T00:00:00Z", VehicleCount::new(1, 2, 3, 4)),
            TimeSeriesEntry::new("2024-01-01T00:01:00Z", VehicleCount::new(5, 0, 1, 0)),
        ];
        let sum = totals(&series);
        assert_eq!(sum, VehicleCount::new(6, 2, 4, 4));
        assert_eq!(sum.total(), 16);
    }

    #[test]
    fn test_deserialize_upstream_entry() {
        let json = r#"{"timestamp": "00:05", "counts": {"motorcycle": 3, "car": 7, "bus": 1, "truck": 2}}"#;
        let entry: TimeSeriesEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.counts.car, 7);
        assert_eq!(entry.counts.total(), 13);
    }
}
