//! ndreco-geometry: Detector volume index and geometry builder.
//!
//! This crate answers "which volume does this point belong to": it holds
//! the immutable set of axis-aligned detector volumes per reconstruction
//! context, and builds that set from a hierarchical geometry model file.
//!

pub mod builder;
pub mod gaps;
pub mod index;
pub mod model;
pub mod transform;
pub mod volume;

pub use builder::GeometryBuilder;
pub use gaps::drift_gaps;
pub use index::VolumeIndex;
pub use model::{GeoModel, GeoNode};
pub use transform::Transform;
pub use volume::{Aabb, Volume, CONTAINMENT_EPSILON};
