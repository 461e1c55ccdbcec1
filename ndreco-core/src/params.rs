//! Per-context steering parameters.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The detector volume kind a reconstruction context is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VolumeKind {
    /// The aggregating main context.
    #[default]
    Main,
    /// Liquid-argon near-detector volume.
    LArNd,
    /// Muon-spectrometer (TMS) volume.
    Tms,
}

/// Input event-record format, which also selects the event-input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataFormat {
    /// Space points without truth.
    #[default]
    Sp,
    /// Space points with truth records.
    SpMc,
    /// TMS hits with truth records.
    TmsMc,
}

/// Feature toggles pushed into a reconstruction framework instance before
/// its settings file is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SteeringFlags {
    /// Run all-hits cosmic-ray reconstruction.
    pub run_all_hits_cosmic_reco: bool,
    /// Stitch cosmic-ray muons crossing between volumes.
    pub run_stitching: bool,
    /// Remove hits from tagged cosmic rays.
    pub run_cosmic_hit_removal: bool,
    /// Slice events into separate regions for processing.
    pub run_slicing: bool,
    /// Run neutrino reconstruction for each slice.
    pub run_neutrino_reco: bool,
    /// Run cosmic-ray reconstruction for each slice.
    pub run_cosmic_reco: bool,
    /// Identify slices and select the most appropriate outputs.
    pub perform_slice_id: bool,
    /// Print per-operation status messages.
    pub print_status: bool,
}

impl Default for SteeringFlags {
    fn default() -> Self {
        Self {
            run_all_hits_cosmic_reco: true,
            run_stitching: true,
            run_cosmic_hit_removal: true,
            run_slicing: true,
            run_neutrino_reco: true,
            run_cosmic_reco: true,
            perform_slice_id: true,
            print_status: false,
        }
    }
}

/// Parameter set for one reconstruction context.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContextParameters {
    /// Path to the framework settings file.
    pub settings_file: PathBuf,
    /// Path to the input event file.
    pub input_file: PathBuf,
    /// Path to the geometry model file.
    pub geometry_file: PathBuf,
    /// Name of the geometry manager inside the model file.
    pub geometry_manager: String,
    /// Substring identifying the sensitive volume nodes.
    pub volume_name: String,
    /// Volume kind of this context.
    pub volume_kind: VolumeKind,
    /// Input data format, selecting the event-input adapter.
    pub data_format: DataFormat,
    /// Create full 3D hits.
    pub use_3d: bool,
    /// Additionally create U/V/W wire-plane view hits.
    pub use_wire_views: bool,
    /// Scale factor bringing all lengths to cm.
    pub length_scale: f32,
    /// Scale factor bringing all energies to GeV.
    pub energy_scale: f32,
    /// Cell size assigned to created hits.
    pub voxel_width: f32,
    /// Number of events to process (negative = all).
    pub n_events_to_process: i32,
    /// Number of events to skip.
    pub n_events_to_skip: i32,
    /// Skip events with more hits than this (negative = no limit).
    pub max_n_hits: i32,
    /// Skip events with fewer hits than this.
    pub min_n_hits: i32,
    /// Framework feature toggles.
    pub flags: SteeringFlags,
}

impl ContextParameters {
    /// Validates the numeric parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`](crate::Error::InvalidParameter)
    /// when a scale factor or cell size is not strictly positive.
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.length_scale > 0.0 && self.length_scale.is_finite()) {
            return Err(crate::Error::InvalidParameter(format!(
                "length_scale must be positive, got {}",
                self.length_scale
            )));
        }
        if !(self.energy_scale > 0.0 && self.energy_scale.is_finite()) {
            return Err(crate::Error::InvalidParameter(format!(
                "energy_scale must be positive, got {}",
                self.energy_scale
            )));
        }
        if !(self.voxel_width > 0.0 && self.voxel_width.is_finite()) {
            return Err(crate::Error::InvalidParameter(format!(
                "voxel_width must be positive, got {}",
                self.voxel_width
            )));
        }
        Ok(())
    }
}

impl Default for ContextParameters {
    fn default() -> Self {
        Self {
            settings_file: PathBuf::new(),
            input_file: PathBuf::new(),
            geometry_file: PathBuf::new(),
            geometry_manager: String::new(),
            volume_name: String::new(),
            volume_kind: VolumeKind::Main,
            data_format: DataFormat::Sp,
            use_3d: true,
            use_wire_views: true,
            length_scale: 1.0,
            energy_scale: 1.0,
            voxel_width: 0.4,
            n_events_to_process: -1,
            n_events_to_skip: 0,
            max_n_hits: -1,
            min_n_hits: 2,
            flags: SteeringFlags::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(ContextParameters::default().validate().is_ok());
        let mut params = ContextParameters::default();
        params.length_scale = 0.0;
        assert!(params.validate().is_err());
        params.length_scale = 1.0;
        params.voxel_width = -0.4;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_parameter_defaults() {
        let params = ContextParameters::default();
        assert_eq!(params.volume_kind, VolumeKind::Main);
        assert_eq!(params.data_format, DataFormat::Sp);
        assert!(params.use_3d);
        assert_eq!(params.min_n_hits, 2);
        assert_eq!(params.max_n_hits, -1);
        assert!(params.flags.run_slicing);
        assert!(!params.flags.print_status);
    }
}
