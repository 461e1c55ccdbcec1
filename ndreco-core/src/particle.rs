//! Truth particle and neutrino records.

use crate::hit::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A true neutrino interaction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Neutrino {
    /// Unique interaction vertex identifier from the input file.
    pub vertex_id: i64,
    /// Neutrino PDG code.
    pub pdg: i32,
    /// Charged-current (0) or neutral-current (1) flag.
    pub ccnc: i32,
    /// Interaction mode code.
    pub mode: i32,
    /// Nuance-like reaction code derived from (ccnc, mode).
    pub nuance_code: i32,
    /// Neutrino energy.
    pub energy: f32,
    /// Neutrino momentum components.
    pub momentum: [f32; 3],
    /// Interaction vertex position.
    pub vertex: Point3,
}

/// A truth particle associated with an interaction vertex.
///
/// `id` is the unique file-based identifier. `parent_id` is already
/// resolved: it names either the parent particle's file-based id, or the
/// neutrino vertex id for primaries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Particle {
    /// Unique file-based identifier.
    pub id: i64,
    /// Identifier of the owning interaction vertex.
    pub vertex_id: i64,
    /// Resolved parent identifier (particle id or vertex id).
    pub parent_id: i64,
    /// PDG code.
    pub pdg: i32,
    /// Nuance-like reaction code inherited from the owning neutrino.
    pub nuance_code: i32,
    /// Total energy.
    pub energy: f32,
    /// Momentum components.
    pub momentum: [f32; 3],
    /// Creation point.
    pub start: Point3,
    /// End point.
    pub end: Point3,
}

impl Particle {
    /// Returns true if the particle links directly to its neutrino vertex.
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.parent_id == self.vertex_id
    }

    /// Returns true if all kinematic quantities are finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.energy.is_finite()
            && self.momentum.iter().all(|p| p.is_finite())
            && self.start.is_finite()
            && self.end.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(parent_id: i64) -> Particle {
        Particle {
            id: 10,
            vertex_id: 1,
            parent_id,
            pdg: 13,
            nuance_code: 1001,
            energy: 1.5,
            momentum: [0.0, 0.0, 1.5],
            start: Point3::new(0.0, 0.0, 0.0),
            end: Point3::new(0.0, 0.0, 10.0),
        }
    }

    #[test]
    fn test_primary_flag() {
        assert!(particle(1).is_primary());
        assert!(!particle(7).is_primary());
    }

    #[test]
    fn test_validity() {
        assert!(particle(1).is_valid());
        let mut bad = particle(1);
        bad.momentum[2] = f32::NAN;
        assert!(!bad.is_valid());
    }
}
