//! Ordered volume lookup.

use std::collections::BTreeMap;

use log::warn;
use ndreco_core::Point3;

use crate::volume::{Aabb, Volume};

/// An immutable, ordered mapping from volume id to volume.
///
/// One index exists per named reconstruction context. It is built once
/// before event processing begins and only read thereafter. Containment
/// queries scan volumes in id order and return the first match; volume
/// counts are small (tens), so a linear scan per query is sufficient.
#[derive(Debug, Clone, Default)]
pub struct VolumeIndex {
    volumes: BTreeMap<i32, Volume>,
}

impl VolumeIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a volume to the index.
    ///
    /// A duplicate id is logged and ignored; the original volume is kept.
    pub fn add_volume(&mut self, bounds: Aabb, id: i32) {
        if self.volumes.contains_key(&id) {
            warn!("trying to add another volume with id {id}, doing nothing");
        } else {
            self.volumes.insert(id, Volume::new(id, bounds));
        }
    }

    /// Returns the id of the first volume (in id order) containing the
    /// point, or `None` when the point lies outside all volumes.
    #[must_use]
    pub fn volume_id_at(&self, point: Point3, ignore_y: bool) -> Option<i32> {
        self.volumes
            .values()
            .find(|v| v.bounds.contains(point, ignore_y))
            .map(|v| v.id)
    }

    /// Returns the module number at the point: volume id / 2, since pairs
    /// of volumes form one physical module.
    #[must_use]
    pub fn module_at(&self, point: Point3, ignore_y: bool) -> Option<i32> {
        self.volume_id_at(point, ignore_y).map(|id| id / 2)
    }

    /// Folds all volumes into one enclosing box, or `None` when the index
    /// is empty. Callers must treat an empty index as "no geometry".
    #[must_use]
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.volumes
            .values()
            .map(|v| v.bounds)
            .reduce(|acc, b| acc.merge(&b))
    }

    /// Looks up a volume by id.
    #[must_use]
    pub fn get(&self, id: i32) -> Option<&Volume> {
        self.volumes.get(&id)
    }

    /// Returns the number of volumes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    /// Returns true if no volumes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    /// Iterates over the volumes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Volume> {
        self.volumes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_volume_index() -> VolumeIndex {
        let mut index = VolumeIndex::new();
        index.add_volume(Aabb::new(-2.0, 0.0, -1.0, 1.0, 0.0, 10.0), 0);
        index.add_volume(Aabb::new(0.0, 2.0, -1.0, 1.0, 0.0, 10.0), 1);
        index
    }

    #[test]
    fn test_volume_id_lookup() {
        let index = two_volume_index();
        assert_eq!(index.volume_id_at(Point3::new(-1.0, 0.0, 5.0), false), Some(0));
        assert_eq!(index.volume_id_at(Point3::new(1.0, 0.0, 5.0), false), Some(1));
        assert_eq!(index.volume_id_at(Point3::new(5.0, 0.0, 5.0), false), None);
    }

    #[test]
    fn test_first_match_in_id_order() {
        let index = two_volume_index();
        // x = 0 sits on the shared boundary, inside both expanded boxes;
        // the lower id wins.
        assert_eq!(index.volume_id_at(Point3::new(0.0, 0.0, 5.0), false), Some(0));
    }

    #[test]
    fn test_module_is_half_id() {
        let index = two_volume_index();
        assert_eq!(index.module_at(Point3::new(-1.0, 0.0, 5.0), false), Some(0));
        assert_eq!(index.module_at(Point3::new(1.0, 0.0, 5.0), false), Some(0));
        assert_eq!(index.module_at(Point3::new(5.0, 0.0, 5.0), false), None);
    }

    #[test]
    fn test_duplicate_id_is_ignored() {
        let mut index = two_volume_index();
        index.add_volume(Aabb::new(100.0, 200.0, 100.0, 200.0, 100.0, 200.0), 1);
        assert_eq!(index.len(), 2);
        // The original bounds survive.
        let v = index.get(1).unwrap();
        assert_relative_eq!(v.bounds.x_min, 0.0);
        assert_relative_eq!(v.bounds.x_max, 2.0);
    }

    #[test]
    fn test_bounding_box_fold() {
        let index = two_volume_index();
        let bounds = index.bounding_box().unwrap();
        assert_relative_eq!(bounds.x_min, -2.0);
        assert_relative_eq!(bounds.x_max, 2.0);
        assert_relative_eq!(bounds.z_max, 10.0);
    }

    #[test]
    fn test_empty_index() {
        let index = VolumeIndex::new();
        assert!(index.is_empty());
        assert!(index.bounding_box().is_none());
        assert_eq!(index.volume_id_at(Point3::new(0.0, 0.0, 0.0), false), None);
    }
}
