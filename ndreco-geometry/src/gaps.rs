//! Inter-volume gap derivation.

use crate::index::VolumeIndex;
use crate::volume::Aabb;

/// Minimum drift-direction separation treated as a real gap rather than
/// shared-boundary jitter.
const MIN_GAP_WIDTH: f64 = 1.0e-3;

/// Derives the dead regions between adjacent volumes along the drift (x)
/// direction.
///
/// Volumes are visited in x order; each strictly positive inter-volume
/// interval becomes one gap box spanning the full y/z extent of the
/// index. An index with fewer than two volumes has no gaps.
#[must_use]
pub fn drift_gaps(index: &VolumeIndex) -> Vec<Aabb> {
    let Some(envelope) = index.bounding_box() else {
        return Vec::new();
    };

    let mut spans: Vec<(f64, f64)> = index.iter().map(|v| (v.bounds.x_min, v.bounds.x_max)).collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut gaps = Vec::new();
    let mut reach = spans[0].1;
    for &(x_min, x_max) in &spans[1..] {
        if x_min - reach > MIN_GAP_WIDTH {
            gaps.push(Aabb::new(
                reach,
                x_min,
                envelope.y_min,
                envelope.y_max,
                envelope.z_min,
                envelope.z_max,
            ));
        }
        reach = reach.max(x_max);
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gap_between_separated_volumes() {
        let mut index = VolumeIndex::new();
        index.add_volume(Aabb::new(-2.0, -1.0, -1.0, 1.0, 0.0, 10.0), 0);
        index.add_volume(Aabb::new(1.0, 2.0, -1.0, 1.0, 0.0, 10.0), 1);

        let gaps = drift_gaps(&index);
        assert_eq!(gaps.len(), 1);
        assert_relative_eq!(gaps[0].x_min, -1.0);
        assert_relative_eq!(gaps[0].x_max, 1.0);
        assert_relative_eq!(gaps[0].z_max, 10.0);
    }

    #[test]
    fn test_touching_volumes_have_no_gap() {
        let mut index = VolumeIndex::new();
        index.add_volume(Aabb::new(-1.0, 0.0, -1.0, 1.0, 0.0, 10.0), 0);
        index.add_volume(Aabb::new(0.0, 1.0, -1.0, 1.0, 0.0, 10.0), 1);
        assert!(drift_gaps(&index).is_empty());
    }

    #[test]
    fn test_overlapping_volumes_have_no_gap() {
        let mut index = VolumeIndex::new();
        index.add_volume(Aabb::new(-1.0, 0.5, -1.0, 1.0, 0.0, 10.0), 0);
        index.add_volume(Aabb::new(0.0, 1.0, -1.0, 1.0, 0.0, 10.0), 1);
        assert!(drift_gaps(&index).is_empty());
    }

    #[test]
    fn test_empty_and_single_volume() {
        let mut index = VolumeIndex::new();
        assert!(drift_gaps(&index).is_empty());
        index.add_volume(Aabb::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0), 0);
        assert!(drift_gaps(&index).is_empty());
    }
}
