//! Spatial cluster type.

use crate::hit::Hit;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A group of spatially connected hits.
///
/// Clusters are produced by the clustering engine and are never empty: a
/// hit with no neighbours forms a singleton cluster.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cluster {
    /// Hits belonging to this cluster, in collection order.
    pub hits: Vec<Hit>,
}

impl Cluster {
    /// Creates an empty cluster.
    #[must_use]
    pub fn new() -> Self {
        Self { hits: Vec::new() }
    }

    /// Creates a cluster with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hits: Vec::with_capacity(capacity),
        }
    }

    /// Adds a hit to the cluster.
    pub fn push(&mut self, hit: Hit) {
        self.hits.push(hit);
    }

    /// Returns the number of hits in the cluster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if the cluster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Sums the deposited energy over all hits.
    #[must_use]
    pub fn total_energy(&self) -> f32 {
        self.hits.iter().map(|h| h.energy).sum()
    }

    /// Returns an iterator over the hits.
    pub fn iter(&self) -> impl Iterator<Item = &Hit> {
        self.hits.iter()
    }
}

impl FromIterator<Hit> for Cluster {
    fn from_iter<I: IntoIterator<Item = Hit>>(iter: I) -> Self {
        Self {
            hits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn test_cluster_operations() {
        let mut cluster = Cluster::with_capacity(4);
        assert!(cluster.is_empty());

        cluster.push(Hit::new(1, Point3::new(0.0, 0.0, 0.0), 0.5, 0));
        cluster.push(Hit::new(2, Point3::new(0.1, 0.0, 0.0), 0.25, 0));

        assert_eq!(cluster.len(), 2);
        assert!(!cluster.is_empty());
        assert_relative_eq!(cluster.total_energy(), 0.75);
    }

    #[test]
    fn test_cluster_from_iterator() {
        let hits = vec![
            Hit::new(1, Point3::new(0.0, 0.0, 0.0), 1.0, 0),
            Hit::new(2, Point3::new(0.0, 0.0, 0.2), 1.0, 0),
        ];
        let cluster: Cluster = hits.into_iter().collect();
        assert_eq!(cluster.len(), 2);
    }
}
