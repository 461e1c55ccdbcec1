//! Local-to-parent volume transforms.

use serde::{Deserialize, Serialize};

/// A rotation plus translation mapping local coordinates into the parent
/// frame. Composing the transforms along a path through the geometry tree
/// yields the local-to-world transform of the leaf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Row-major rotation matrix.
    pub rotation: [[f64; 3]; 3],
    /// Translation applied after rotation.
    pub translation: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            translation: [0.0, 0.0, 0.0],
        }
    }

    /// Composes this transform with a child's local transform, yielding
    /// the transform taking the child's local frame to this frame's
    /// parent.
    #[must_use]
    pub fn compose(&self, local: &Self) -> Self {
        let mut rotation = [[0.0; 3]; 3];
        for (i, row) in rotation.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (0..3).map(|k| self.rotation[i][k] * local.rotation[k][j]).sum();
            }
        }

        let rotated = self.apply_vector(local.translation);
        let translation = [
            rotated[0] + self.translation[0],
            rotated[1] + self.translation[1],
            rotated[2] + self.translation[2],
        ];

        Self {
            rotation,
            translation,
        }
    }

    /// Applies the rotation part only, for direction-like quantities.
    #[must_use]
    pub fn apply_vector(&self, v: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (i, value) in out.iter_mut().enumerate() {
            *value = self.rotation[i][0] * v[0] + self.rotation[i][1] * v[1] + self.rotation[i][2] * v[2];
        }
        out
    }

    /// Applies rotation then translation, for position-like quantities.
    #[must_use]
    pub fn apply_point(&self, p: [f64; 3]) -> [f64; 3] {
        let rotated = self.apply_vector(p);
        [
            rotated[0] + self.translation[0],
            rotated[1] + self.translation[1],
            rotated[2] + self.translation[2],
        ]
    }
}
