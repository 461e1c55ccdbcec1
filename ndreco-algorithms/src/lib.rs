//! ndreco-algorithms: First-pass spatial clustering.
//!
//! Groups 3D hits into connected clusters: a 2D grid index over the
//! (x, z) projection pre-filters neighbour candidates, confirmed pairs
//! form an association graph, and a deterministic flood fill merges the
//! transitively connected hits.
//!
#![warn(missing_docs)]

mod cluster3d;
pub mod spatial;

pub use cluster3d::{ClusterConfig, SimpleClustering};
pub use spatial::SpatialGrid;
