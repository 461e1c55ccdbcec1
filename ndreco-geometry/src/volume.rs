//! Axis-aligned detector volumes.

use ndreco_core::Point3;
use serde::{Deserialize, Serialize};

/// Tolerance applied per axis when testing point containment, so that
/// points on a volume boundary do not flicker between inside and outside.
pub const CONTAINMENT_EPSILON: f64 = 1.0e-3;

/// An axis-aligned box with min <= max on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum x bound.
    pub x_min: f64,
    /// Maximum x bound.
    pub x_max: f64,
    /// Minimum y bound.
    pub y_min: f64,
    /// Maximum y bound.
    pub y_max: f64,
    /// Minimum z bound.
    pub z_min: f64,
    /// Maximum z bound.
    pub z_max: f64,
}

impl Aabb {
    /// Creates a new box from per-axis bounds.
    #[must_use]
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_min: f64, z_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            z_min,
            z_max,
        }
    }

    /// Tests whether a point lies inside the epsilon-expanded box.
    ///
    /// With `ignore_y` the y axis is skipped, supporting 2D projected
    /// queries against flattened detectors.
    #[must_use]
    pub fn contains(&self, point: Point3, ignore_y: bool) -> bool {
        let x = f64::from(point.x);
        let y = f64::from(point.y);
        let z = f64::from(point.z);

        if x <= self.x_min - CONTAINMENT_EPSILON || x >= self.x_max + CONTAINMENT_EPSILON {
            return false;
        }
        if !ignore_y && (y <= self.y_min - CONTAINMENT_EPSILON || y >= self.y_max + CONTAINMENT_EPSILON)
        {
            return false;
        }
        if z <= self.z_min - CONTAINMENT_EPSILON || z >= self.z_max + CONTAINMENT_EPSILON {
            return false;
        }

        true
    }

    /// Returns the smallest box enclosing this box and another.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
            z_min: self.z_min.min(other.z_min),
            z_max: self.z_max.max(other.z_max),
        }
    }

    /// Returns the box centre.
    #[must_use]
    pub fn centre(&self) -> [f64; 3] {
        [
            0.5 * (self.x_min + self.x_max),
            0.5 * (self.y_min + self.y_max),
            0.5 * (self.z_min + self.z_max),
        ]
    }
}

/// One detector volume: an axis-aligned box tagged with its unique id.
///
/// Volumes are created once by the geometry builder and immutable
/// thereafter. Pairs of volumes with consecutive ids form one physical
/// module (module id = volume id / 2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    /// Unique volume id within one index.
    pub id: i32,
    /// World-space bounds.
    pub bounds: Aabb,
}

impl Volume {
    /// Creates a new volume.
    #[must_use]
    pub fn new(id: i32, bounds: Aabb) -> Self {
        Self { id, bounds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_containment_strict_interior() {
        let bounds = Aabb::new(-1.0, 1.0, -2.0, 2.0, 0.0, 10.0);
        assert!(bounds.contains(Point3::new(0.0, 0.0, 5.0), false));
        assert!(!bounds.contains(Point3::new(1.5, 0.0, 5.0), false));
        assert!(!bounds.contains(Point3::new(0.0, -2.5, 5.0), false));
        assert!(!bounds.contains(Point3::new(0.0, 0.0, 10.5), false));
    }

    #[test]
    fn test_containment_boundary_tolerance() {
        let bounds = Aabb::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        // A point exactly on the boundary is inside the expanded box.
        assert!(bounds.contains(Point3::new(1.0, 0.0, 0.0), false));
        // A point further out than the tolerance is not.
        assert!(!bounds.contains(Point3::new(1.01, 0.0, 0.0), false));
    }

    #[test]
    fn test_containment_ignore_y() {
        let bounds = Aabb::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
        let above = Point3::new(0.0, 50.0, 0.0);
        assert!(!bounds.contains(above, false));
        assert!(bounds.contains(above, true));
    }

    #[test]
    fn test_merge() {
        let a = Aabb::new(-1.0, 1.0, -1.0, 1.0, 0.0, 2.0);
        let b = Aabb::new(0.0, 3.0, -4.0, 0.5, 1.0, 1.5);
        let m = a.merge(&b);
        assert_relative_eq!(m.x_min, -1.0);
        assert_relative_eq!(m.x_max, 3.0);
        assert_relative_eq!(m.y_min, -4.0);
        assert_relative_eq!(m.y_max, 1.0);
        assert_relative_eq!(m.z_min, 0.0);
        assert_relative_eq!(m.z_max, 2.0);
    }

    #[test]
    fn test_centre() {
        let bounds = Aabb::new(0.0, 2.0, -2.0, 0.0, 4.0, 8.0);
        let c = bounds.centre();
        assert_relative_eq!(c[0], 1.0);
        assert_relative_eq!(c[1], -1.0);
        assert_relative_eq!(c[2], 6.0);
    }
}
