//! Geometry builder: volume tree to volume index.

use std::path::Path;

use log::info;

use crate::index::VolumeIndex;
use crate::model::{GeoModel, GeoNode};
use crate::transform::Transform;
use crate::volume::Aabb;

/// Walks a geometry model and extracts the world-space bounds of the
/// sensitive volumes into a [`VolumeIndex`].
///
/// Volume ids are assigned in discovery order starting from a caller
/// supplied offset, so several builds can populate one global id space
/// without collision.
#[derive(Debug, Clone)]
pub struct GeometryBuilder {
    model: Option<GeoModel>,
    length_scale: f64,
}

impl GeometryBuilder {
    /// Creates a builder over an already-loaded model.
    #[must_use]
    pub fn new(model: GeoModel, length_scale: f64) -> Self {
        Self {
            model: Some(model),
            length_scale,
        }
    }

    /// Opens a geometry model file and creates a builder.
    ///
    /// If the file cannot be opened or the manager is absent the builder
    /// degrades: every [`GeometryBuilder::build`] call returns an empty
    /// index, and callers must check for emptiness.
    #[must_use]
    pub fn from_file(path: &Path, manager_name: &str, length_scale: f64) -> Self {
        Self {
            model: GeoModel::open(path, manager_name),
            length_scale,
        }
    }

    /// Returns true if a model was loaded.
    #[must_use]
    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Builds the volume index for all nodes whose name contains
    /// `target_name`, assigning ids `id_offset, id_offset + 1, ...` in
    /// discovery order.
    #[must_use]
    pub fn build(&self, target_name: &str, id_offset: i32) -> VolumeIndex {
        let mut index = VolumeIndex::new();

        let Some(model) = &self.model else {
            return index;
        };

        // Collect the child-index paths of all matching nodes.
        let mut paths: Vec<Vec<usize>> = Vec::new();
        let mut current = Vec::new();
        Self::search(&model.root, target_name, &mut current, &mut paths);
        info!(
            "found {} matches for volumes containing the name {target_name}",
            paths.len()
        );

        // Re-walk each path, composing local transforms into world space.
        for (n, path) in paths.iter().enumerate() {
            let mut transform = model.root.transform();
            let mut node = &model.root;
            for &child in path {
                node = &node.children[child];
                transform = transform.compose(&node.transform());
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let id = id_offset + n as i32;
            index.add_volume(self.world_bounds(&transform, node), id);
        }

        index
    }

    /// Computes the world-space bounds of a matched node: the box origin
    /// taken through the composed transform, expanded by the half widths,
    /// with every distance scaled to the common length unit.
    fn world_bounds(&self, transform: &Transform, node: &GeoNode) -> Aabb {
        let centre = transform.apply_point(node.origin);
        let cx = centre[0] * self.length_scale;
        let cy = centre[1] * self.length_scale;
        let cz = centre[2] * self.length_scale;

        let dx = node.half_extents[0] * self.length_scale;
        let dy = node.half_extents[1] * self.length_scale;
        let dz = node.half_extents[2] * self.length_scale;

        Aabb::new(cx - dx, cx + dx, cy - dy, cy + dy, cz - dz, cz + dz)
    }

    fn search(node: &GeoNode, target: &str, current: &mut Vec<usize>, paths: &mut Vec<Vec<usize>>) {
        if node.name.contains(target) {
            paths.push(current.clone());
        } else {
            for (i, child) in node.children.iter().enumerate() {
                current.push(i);
                Self::search(child, target, current, paths);
                current.pop();
            }
        }
    }
}
