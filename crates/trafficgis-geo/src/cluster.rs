//! Proximity clustering for marker aggregation.
//!
//! Points are snapped to a grid whose cell edge equals the cluster radius.
//! Occupied cells that touch, including diagonally, are merged with a
//! disjoint-set forest, so the result depends only on the positions and not
//! on input order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use trafficgis_core::models::{Cluster, PointSet};
use trafficgis_core::{Result, TrafficGisError};

use crate::spatial::{bounding_box, centroid, km_to_lat_degrees, km_to_lon_degrees};

pub const DEFAULT_CLUSTER_RADIUS_M: f64 = 500.0;

/// Smallest accepted radius; keeps grid indices far inside `i64`
pub const MIN_CLUSTER_RADIUS_M: f64 = 0.001;

/// Disjoint-set forest over cell indices
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let px = self.find(x);
        let py = self.find(y);
        if px == py {
            return;
        }
        if self.rank[px] < self.rank[py] {
            self.parent[px] = py;
        } else if self.rank[px] > self.rank[py] {
            self.parent[py] = px;
        } else {
            self.parent[py] = px;
            self.rank[px] += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterAggregator {
    radius_m: f64,
}

impl ClusterAggregator {
    pub fn new(radius_m: f64) -> Result<Self> {
        if !radius_m.is_finite() || radius_m < MIN_CLUSTER_RADIUS_M {
            return Err(TrafficGisError::InvalidParameter {
                name: "radius_m".to_string(),
                reason: format!(
                    "must be a number of meters no smaller than {}, got {}",
                    MIN_CLUSTER_RADIUS_M, radius_m
                ),
            });
        }
        Ok(Self { radius_m })
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Group points into clusters
    ///
    /// Every input point belongs to exactly one cluster. Clusters are ordered
    /// by member count, largest first, then by their smallest member id.
    pub fn build(&self, points: &PointSet) -> Vec<Cluster> {
        let (Some(bbox), Some((mean_lat, _))) = (bounding_box(points), centroid(points)) else {
            return Vec::new();
        };

        let radius_km = self.radius_m / 1000.0;
        let lat_step = km_to_lat_degrees(radius_km);
        let lon_step = km_to_lon_degrees(radius_km, mean_lat);

        // Occupied cell -> dense index, plus the point indices in each cell
        let mut cell_index: HashMap<(i64, i64), usize> = HashMap::new();
        let mut cell_members: Vec<Vec<usize>> = Vec::new();
        let mut cell_keys: Vec<(i64, i64)> = Vec::new();

        for (i, point) in points.iter().enumerate() {
            let key = (
                ((point.latitude() - bbox.min_lat) / lat_step).floor() as i64,
                ((point.longitude() - bbox.min_lon) / lon_step).floor() as i64,
            );
            let idx = *cell_index.entry(key).or_insert_with(|| {
                cell_members.push(Vec::new());
                cell_keys.push(key);
                cell_members.len() - 1
            });
            cell_members[idx].push(i);
        }

        let mut forest = UnionFind::new(cell_members.len());
        for (idx, &(row, col)) in cell_keys.iter().enumerate() {
            for dr in -1i64..=1 {
                for dc in -1i64..=1 {
                    let (Some(r), Some(c)) = (row.checked_add(dr), col.checked_add(dc)) else {
                        continue;
                    };
                    if let Some(&neighbor) = cell_index.get(&(r, c)) {
                        forest.union(idx, neighbor);
                    }
                }
            }
        }

        let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (idx, members) in cell_members.iter().enumerate() {
            let root = forest.find(idx);
            components.entry(root).or_default().extend(members.iter().copied());
        }

        let records = points.as_slice();
        let mut clusters: Vec<Cluster> = components
            .into_values()
            .map(|members| {
                let n = members.len() as f64;
                let (lat_sum, lon_sum) = members.iter().fold((0.0, 0.0), |(lat, lon), &i| {
                    (lat + records[i].latitude(), lon + records[i].longitude())
                });
                let member_ids: BTreeSet<String> =
                    members.iter().map(|&i| records[i].id().to_string()).collect();

                Cluster {
                    centroid_lat: lat_sum / n,
                    centroid_lon: lon_sum / n,
                    member_count: members.len(),
                    member_ids,
                }
            })
            .collect();

        clusters.sort_by(|a, b| {
            b.member_count
                .cmp(&a.member_count)
                .then_with(|| a.member_ids.iter().next().cmp(&b.member_ids.iter().next()))
        });

        tracing::debug!(
            points = points.len(),
            clusters = clusters.len(),
            radius_m = self.radius_m,
            "Aggregated clusters"
        );

        clusters
    }
}

impl Default for ClusterAggregator {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_CLUSTER_RADIUS_M,
        }
    }
}

/// Convenience wrapper around [`ClusterAggregator`]
pub fn build_clusters(points: &PointSet, radius_m: f64) -> Result<Vec<Cluster>> {
    Ok(ClusterAggregator::new(radius_m)?.build(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trafficgis_core::models::{ClusterTier, PointRecord, TierThresholds};

    fn record(id: &str, lat: f64, lon: f64) -> PointRecord {
        PointRecord::new(id, lat, lon, None).unwrap()
    }

    #[test]
    fn test_union_find() {
        let mut uf = UnionFind::new(5);
        uf.union(0, 1);
        uf.union(3, 4);
        uf.union(1, 4);
        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(0), uf.find(2));
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(ClusterAggregator::new(0.0).is_err());
        assert!(ClusterAggregator::new(-5.0).is_err());
        assert!(build_clusters(&PointSet::empty(), f64::INFINITY).is_err());
    }

    #[test]
    fn test_rejects_radius_below_minimum() {
        let points =
            PointSet::new(vec![record("A", -89.0, -179.0), record("B", 89.0, 179.0)]).unwrap();
        assert!(matches!(
            build_clusters(&points, 1e-13),
            Err(TrafficGisError::InvalidParameter { .. })
        ));
        assert!(ClusterAggregator::new(MIN_CLUSTER_RADIUS_M / 2.0).is_err());
    }

    #[test]
    fn test_minimum_radius_across_the_globe() {
        let points = PointSet::new(vec![
            record("A", -89.0, -179.0),
            record("B", 89.0, 179.0),
            record("C", 89.0, 179.0),
        ])
        .unwrap();

        let clusters = build_clusters(&points, MIN_CLUSTER_RADIUS_M).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].member_count, 2);
        assert!(clusters[0].member_ids.contains("B"));
        assert!(clusters[0].member_ids.contains("C"));
        assert_eq!(clusters[1].member_count, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(ClusterAggregator::default().build(&PointSet::empty()).is_empty());
    }

    #[test]
    fn test_nearby_points_merge() {
        // About 100 m apart
        let points = PointSet::new(vec![
            record("A", 28.6139, 77.2090),
            record("B", 28.6148, 77.2090),
            record("FAR", 28.7041, 77.1025),
        ])
        .unwrap();

        let clusters = ClusterAggregator::default().build(&points);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].member_count, 2);
        assert!(clusters[0].member_ids.contains("A"));
        assert!(clusters[0].member_ids.contains("B"));
        assert_eq!(clusters[1].member_ids.iter().next().map(String::as_str), Some("FAR"));
    }

    #[test]
    fn test_duplicate_positions_share_a_cluster() {
        let points =
            PointSet::new(vec![record("A", 10.0, 10.0), record("B", 10.0, 10.0)]).unwrap();
        let clusters = ClusterAggregator::default().build(&points);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].centroid_lat, 10.0);
        assert_eq!(clusters[0].centroid_lon, 10.0);
    }

    #[test]
    fn test_every_point_assigned_once() {
        let points = PointSet::new(
            (0..40)
                .map(|i| {
                    let lat = 28.5 + (i as f64) * 0.004;
                    let lon = 77.1 + (i % 7) as f64 * 0.01;
                    record(&format!("P{:02}", i), lat, lon)
                })
                .collect(),
        )
        .unwrap();

        let clusters = ClusterAggregator::new(300.0).unwrap().build(&points);
        let total: usize = clusters.iter().map(|c| c.member_count).sum();
        assert_eq!(total, 40);

        let mut seen = BTreeSet::new();
        for cluster in &clusters {
            for id in &cluster.member_ids {
                assert!(seen.insert(id.clone()), "{} assigned twice", id);
            }
        }
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![
            record("A", 28.6139, 77.2090),
            record("B", 28.6148, 77.2090),
            record("C", 28.7041, 77.1025),
            record("D", 28.7045, 77.1030),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = ClusterAggregator::default().build(&PointSet::new(forward).unwrap());
        let b = ClusterAggregator::default().build(&PointSet::new(reversed).unwrap());
        let ids = |cs: &[Cluster]| cs.iter().map(|c| c.member_ids.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_medium_cluster_tier() {
        let points = PointSet::new(
            (0..12)
                .map(|i| record(&format!("C{}", i), 28.6139, 77.2090 + i as f64 * 0.0001))
                .collect(),
        )
        .unwrap();

        let clusters = ClusterAggregator::default().build(&points);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].tier(&TierThresholds::default()), ClusterTier::Medium);
    }
}
