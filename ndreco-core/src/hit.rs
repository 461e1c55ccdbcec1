//! Hit types for 3D energy-deposit samples.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Energy of a minimum-ionising deposit, used to express hit energies in
/// MIP-equivalent units.
pub const MIP_ENERGY: f32 = 0.000_75;

/// A position in detector coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point3 {
    /// X coordinate (drift direction).
    pub x: f32,
    /// Y coordinate (vertical).
    pub y: f32,
    /// Z coordinate (beam direction).
    pub z: f32,
}

impl Point3 {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Computes the squared Euclidean distance to another position.
    #[inline]
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Returns true if all components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// The readout view a hit belongs to.
///
/// Space points are stored as full 3D hits; when the wire-plane option is
/// enabled each space point additionally yields projected hits in the
/// U, V and W views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HitView {
    /// Full 3D space point.
    #[default]
    ThreeD,
    /// U wire-plane projection.
    U,
    /// V wire-plane projection.
    V,
    /// W wire-plane projection.
    W,
}

/// A single energy-deposit sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hit {
    /// Globally unique identifier within the event.
    pub id: i64,
    /// Hit position.
    pub position: Point3,
    /// Deposited energy or collected charge.
    pub energy: f32,
    /// Energy in MIP-equivalent units.
    pub mip_equivalent: f32,
    /// Readout view.
    pub view: HitView,
    /// Id of the detector volume containing the hit (0 when outside all).
    pub volume_id: i32,
}

impl Hit {
    /// Creates a new 3D hit, deriving the MIP-equivalent energy.
    #[must_use]
    pub fn new(id: i64, position: Point3, energy: f32, volume_id: i32) -> Self {
        Self {
            id,
            position,
            energy,
            mip_equivalent: energy / MIP_ENERGY,
            view: HitView::ThreeD,
            volume_id,
        }
    }

    /// Returns a copy of this hit re-projected into the given view.
    #[must_use]
    pub fn with_view(mut self, id: i64, view: HitView, position: Point3) -> Self {
        self.id = id;
        self.view = view;
        self.position = position;
        self
    }

    /// Returns true if the position and energy are all finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.energy.is_finite()
    }
}
