//! ndreco-core: Core types for near-detector event assembly.
//!
//! This crate provides the shared data model: 3D hit samples, truth
//! particles, spatial clusters and the per-context parameter sets that
//! steer the reconstruction pipeline.
//!

pub mod cluster;
pub mod error;
pub mod hit;
pub mod params;
pub mod particle;
pub mod reaction;
pub mod views;

pub use cluster::Cluster;
pub use error::{CreationOutcome, Error, Result};
pub use hit::{Hit, HitView, Point3, MIP_ENERGY};
pub use params::{ContextParameters, DataFormat, SteeringFlags, VolumeKind};
pub use particle::{Neutrino, Particle};
