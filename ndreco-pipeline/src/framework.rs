//! Reconstruction framework interface.
//!
//! The orchestrator treats each reconstruction framework instance as an
//! opaque collaborator: objects are created into it per event, the event
//! is processed, outputs are read back, and the instance is reset. Its
//! only sequencing contract is that processing and reset happen exactly
//! once per context per event, in that order, and that output objects
//! are valid only between those two calls.

use std::path::Path;
use std::sync::Arc;

use ndreco_core::{
    Cluster, ContextParameters, CreationOutcome, Hit, Neutrino, Particle, Point3, SteeringFlags,
};
use ndreco_geometry::{Aabb, Volume};

use crate::error::Result;

/// An aggregate reconstruction output object.
///
/// Pfos are shared by handle between a daughter instance and the main
/// aggregate; copying a Pfo into the main context never duplicates it.
#[derive(Debug, Clone)]
pub struct Pfo {
    /// Name of the framework instance that produced the object.
    pub source: String,
    /// The hits grouped into this object.
    pub cluster: Cluster,
    /// Total deposited energy.
    pub energy: f32,
}

/// A reconstructed track seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    /// Globally unique identifier within the event.
    pub id: i64,
    /// Track start point.
    pub start: Point3,
    /// Track end point.
    pub end: Point3,
}

/// One reconstruction framework instance, bound to a named context.
pub trait RecoFramework {
    /// Returns the instance name.
    fn name(&self) -> &str;

    /// Pushes the steering flags into the instance.
    ///
    /// # Errors
    ///
    /// A failure here is framework-reported and fatal.
    fn configure(&mut self, flags: &SteeringFlags) -> Result<()>;

    /// Loads the instance settings file.
    ///
    /// # Errors
    ///
    /// A missing or malformed settings file is fatal.
    fn load_settings(&mut self, path: &Path) -> Result<()>;

    /// Registers one detector volume.
    ///
    /// # Errors
    ///
    /// Callers treat a failure as per-volume: the volume is absent from
    /// the instance, the run continues.
    fn create_volume(&mut self, volume: &Volume) -> Result<()>;

    /// Registers one dead region between volumes.
    ///
    /// # Errors
    ///
    /// Per-object, as for [`RecoFramework::create_volume`].
    fn create_gap(&mut self, gap: &Aabb) -> Result<()>;

    /// Adds a hit to the current event.
    ///
    /// # Errors
    ///
    /// Only unexpected framework failures are errors; a routinely
    /// invalid hit is reported through the returned outcome.
    fn create_hit(&mut self, hit: Hit) -> Result<CreationOutcome>;

    /// Adds a truth particle to the current event.
    ///
    /// # Errors
    ///
    /// As for [`RecoFramework::create_hit`].
    fn create_particle(&mut self, particle: Particle) -> Result<CreationOutcome>;

    /// Adds a truth neutrino to the current event.
    ///
    /// # Errors
    ///
    /// As for [`RecoFramework::create_hit`].
    fn create_neutrino(&mut self, neutrino: Neutrino) -> Result<CreationOutcome>;

    /// Adds a track to the current event.
    ///
    /// # Errors
    ///
    /// As for [`RecoFramework::create_hit`].
    fn create_track(&mut self, track: Track) -> Result<CreationOutcome>;

    /// Relates a created hit to the truth particle contributing most of
    /// its energy.
    ///
    /// # Errors
    ///
    /// Only unexpected framework failures are errors.
    fn set_hit_truth(&mut self, hit_id: i64, particle_id: i64, fraction: f32) -> Result<()>;

    /// Runs the instance over the current event's objects.
    ///
    /// # Errors
    ///
    /// A processing failure is fatal and aborts the run.
    fn process_event(&mut self) -> Result<()>;

    /// Clears all per-event object lists.
    ///
    /// # Errors
    ///
    /// A reset failure is fatal and aborts the run.
    fn reset(&mut self) -> Result<()>;

    /// Returns the current output objects.
    fn current_pfos(&self) -> &[Arc<Pfo>];

    /// Copies output objects into this instance's aggregate by handle.
    fn adopt_pfos(&mut self, pfos: &[Arc<Pfo>]);
}

/// Creates the framework instance for a named context.
pub trait FrameworkFactory {
    /// Creates a configured instance.
    ///
    /// # Errors
    ///
    /// A creation failure is framework-reported and fatal.
    fn create(&self, name: &str, params: &ContextParameters) -> Result<Box<dyn RecoFramework>>;
}
