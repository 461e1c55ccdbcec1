//! Wire-plane view projections.
//!
//! Space points are projected onto the U, V and W readout views assuming
//! x is the common drift coordinate: the projected hit keeps its x value
//! and maps (y, z) onto the wire-pitch coordinate of the view.

/// U plane angle from the vertical, radians.
pub const THETA_U: f32 = std::f32::consts::FRAC_PI_3;
/// V plane angle from the vertical, radians.
pub const THETA_V: f32 = -std::f32::consts::FRAC_PI_3;

/// Projects (y, z) onto the U view.
#[must_use]
pub fn yz_to_u(y: f32, z: f32) -> f32 {
    z * THETA_U.cos() - y * THETA_U.sin()
}

/// Projects (y, z) onto the V view.
#[must_use]
pub fn yz_to_v(y: f32, z: f32) -> f32 {
    z * THETA_V.cos() - y * THETA_V.sin()
}

/// Projects (y, z) onto the W view (the unrotated collection plane).
#[must_use]
pub fn yz_to_w(_y: f32, z: f32) -> f32 {
    z
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_w_is_z() {
        assert_relative_eq!(yz_to_w(5.0, 3.0), 3.0);
    }

    #[test]
    fn test_u_v_symmetric_about_w() {
        // For y = 0 the U and V projections agree with each other.
        assert_relative_eq!(yz_to_u(0.0, 2.0), yz_to_v(0.0, 2.0));
        // A pure y displacement moves U and V in opposite directions.
        assert_relative_eq!(yz_to_u(1.0, 0.0), -yz_to_v(1.0, 0.0));
    }
}
