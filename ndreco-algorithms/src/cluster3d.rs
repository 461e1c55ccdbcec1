//! Connectivity clustering of 3D hits.

use std::cmp::Ordering;

use log::warn;
use ndreco_core::{Cluster, Hit};
use rayon::prelude::*;

use crate::spatial::SpatialGrid;

/// Configuration for the spatial clustering engine.
#[derive(Debug, Clone, Copy)]
pub struct ClusterConfig {
    /// Squared distance below which two hits are associated.
    pub window_squared: f32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            window_squared: 0.25,
        }
    }
}

impl ClusterConfig {
    /// Creates a configuration from an unsquared clustering window.
    #[must_use]
    pub fn with_window(window: f32) -> Self {
        Self {
            window_squared: window * window,
        }
    }
}

/// Groups hits into clusters of transitively connected neighbours.
///
/// Two hits are associated when their true 3D separation is below the
/// clustering window. Clusters are the connected components of the
/// association graph, collected by a seeded flood fill in a fixed
/// position order so that membership, cluster order and in-cluster hit
/// order are all reproducible.
#[derive(Debug, Clone, Default)]
pub struct SimpleClustering {
    config: ClusterConfig,
}

/// Fixed total order on hits: position (z, x, y), then energy, then id.
fn position_order(a: &Hit, b: &Hit) -> Ordering {
    a.position
        .z
        .total_cmp(&b.position.z)
        .then_with(|| a.position.x.total_cmp(&b.position.x))
        .then_with(|| a.position.y.total_cmp(&b.position.y))
        .then_with(|| b.energy.total_cmp(&a.energy))
        .then_with(|| a.id.cmp(&b.id))
}

impl SimpleClustering {
    /// Creates a clustering engine with the given configuration.
    #[must_use]
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Clusters one event's hits.
    ///
    /// Every valid hit ends up in exactly one cluster; a hit with no
    /// neighbours forms a singleton. Hits with non-finite coordinates or
    /// energy are skipped before indexing.
    #[must_use]
    pub fn cluster(&self, hits: &[Hit]) -> Vec<Cluster> {
        #[allow(clippy::cast_possible_truncation)]
        let valid: Vec<u32> = hits
            .par_iter()
            .enumerate()
            .filter(|(_, hit)| hit.is_valid())
            .map(|(i, _)| i as u32)
            .collect();

        let n_skipped = hits.len() - valid.len();
        if n_skipped > 0 {
            warn!("skipping {n_skipped} hits with non-finite coordinates or energy");
        }
        if valid.is_empty() {
            return Vec::new();
        }

        let associations = self.build_association_map(hits, &valid);
        Self::create_clusters(hits, &valid, &associations)
    }

    /// Builds the symmetric hit-association adjacency lists.
    ///
    /// The grid index pre-filters candidates on the (x, z) projection;
    /// the true 3D distance confirms each pair. Lists are keyed by
    /// position in `valid` and sorted into the fixed position order.
    fn build_association_map(&self, hits: &[Hit], valid: &[u32]) -> Vec<Vec<u32>> {
        let radius = self.config.window_squared.sqrt();
        let mut grid = SpatialGrid::new(radius);
        for (slot, &i) in valid.iter().enumerate() {
            let p = hits[i as usize].position;
            #[allow(clippy::cast_possible_truncation)]
            grid.insert(p.x, p.z, slot as u32);
        }

        let mut associations: Vec<Vec<u32>> = vec![Vec::new(); valid.len()];
        let mut candidates = Vec::new();

        for (slot, &i) in valid.iter().enumerate() {
            let p = hits[i as usize].position;
            grid.query_neighbourhood(p.x, p.z, &mut candidates);

            for &other in &candidates {
                let other = other as usize;
                // Each unordered pair is handled once, from its lower slot.
                if other <= slot {
                    continue;
                }
                let q = hits[valid[other] as usize].position;
                if p.distance_squared(&q) < self.config.window_squared {
                    #[allow(clippy::cast_possible_truncation)]
                    associations[slot].push(other as u32);
                    #[allow(clippy::cast_possible_truncation)]
                    associations[other].push(slot as u32);
                }
            }
        }

        for list in &mut associations {
            list.sort_unstable_by(|&a, &b| {
                position_order(&hits[valid[a as usize] as usize], &hits[valid[b as usize] as usize])
            });
        }

        associations
    }

    /// Flood-fills the association graph from seeds in position order.
    fn create_clusters(hits: &[Hit], valid: &[u32], associations: &[Vec<u32>]) -> Vec<Cluster> {
        #[allow(clippy::cast_possible_truncation)]
        let mut seeds: Vec<u32> = (0..valid.len() as u32).collect();
        seeds.sort_unstable_by(|&a, &b| {
            position_order(&hits[valid[a as usize] as usize], &hits[valid[b as usize] as usize])
        });

        let mut claimed = vec![false; valid.len()];
        let mut in_merge = vec![false; valid.len()];
        let mut clusters = Vec::new();

        for &seed in &seeds {
            if claimed[seed as usize] {
                continue;
            }

            // Depth-first collection over the association graph with an
            // explicit stack, visiting neighbours in the fixed order.
            let mut merge = vec![seed];
            in_merge[seed as usize] = true;
            let mut stack: Vec<(u32, usize)> = vec![(seed, 0)];

            while let Some((node, cursor)) = stack.last_mut() {
                let adjacent = &associations[*node as usize];
                if *cursor < adjacent.len() {
                    let next = adjacent[*cursor];
                    *cursor += 1;
                    if !claimed[next as usize] && !in_merge[next as usize] {
                        in_merge[next as usize] = true;
                        merge.push(next);
                        stack.push((next, 0));
                    }
                } else {
                    stack.pop();
                }
            }

            let cluster: Cluster = merge
                .iter()
                .map(|&slot| hits[valid[slot as usize] as usize])
                .collect();
            for slot in merge {
                claimed[slot as usize] = true;
                in_merge[slot as usize] = false;
            }
            clusters.push(cluster);
        }

        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndreco_core::Point3;

    fn hit(id: i64, x: f32, y: f32, z: f32) -> Hit {
        Hit::new(id, Point3::new(x, y, z), 1.0, 0)
    }

    #[test]
    fn test_two_near_one_far() {
        let hits = vec![
            hit(0, 0.0, 0.0, 0.0),
            hit(1, 0.0, 0.0, 0.3),
            hit(2, 0.0, 0.0, 10.0),
        ];
        let clusters = SimpleClustering::default().cluster(&hits);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].len(), 1);
        assert_eq!(clusters[1].hits[0].id, 2);
    }

    #[test]
    fn test_empty_input() {
        let clusters = SimpleClustering::default().cluster(&[]);
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_singleton_cluster() {
        let clusters = SimpleClustering::default().cluster(&[hit(7, 1.0, 2.0, 3.0)]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 1);
        assert_eq!(clusters[0].hits[0].id, 7);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Separation exactly at the window is not an association.
        let hits = vec![hit(0, 0.0, 0.0, 0.0), hit(1, 0.0, 0.0, 0.5)];
        let clusters = SimpleClustering::default().cluster(&hits);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_non_finite_hits_are_skipped() {
        let hits = vec![
            hit(0, 0.0, 0.0, 0.0),
            hit(1, f32::NAN, 0.0, 0.1),
            hit(2, 0.0, 0.0, 0.2),
        ];
        let clusters = SimpleClustering::default().cluster(&hits);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn test_custom_window() {
        let hits = vec![hit(0, 0.0, 0.0, 0.0), hit(1, 0.0, 0.0, 1.0)];
        let wide = SimpleClustering::new(ClusterConfig::with_window(1.5));
        assert_eq!(wide.cluster(&hits).len(), 1);
        let narrow = SimpleClustering::new(ClusterConfig::with_window(0.5));
        assert_eq!(narrow.cluster(&hits).len(), 2);
    }
}
