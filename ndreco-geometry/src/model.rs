//! On-disk hierarchical geometry model.
//!
//! A geometry model file holds one or more named managers, each a tree of
//! named, transformed box volumes. The builder walks this tree to extract
//! the world-space bounds of the sensitive volumes.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::error;
use serde::Deserialize;

use crate::transform::Transform;

fn identity_rotation() -> [[f64; 3]; 3] {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

/// One node in the geometry tree: a named box volume with a local
/// transform relative to its parent.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoNode {
    /// Node name; sensitive volumes are located by substring match.
    pub name: String,
    /// Local-to-parent rotation, row major.
    #[serde(default = "identity_rotation")]
    pub rotation: [[f64; 3]; 3],
    /// Local-to-parent translation.
    #[serde(default)]
    pub translation: [f64; 3],
    /// Half widths of the node's bounding box along each axis.
    #[serde(default)]
    pub half_extents: [f64; 3],
    /// Offset of the box origin within the node's local frame.
    #[serde(default)]
    pub origin: [f64; 3],
    /// Daughter nodes.
    #[serde(default)]
    pub children: Vec<GeoNode>,
}

impl GeoNode {
    /// Returns the node's local-to-parent transform.
    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform {
            rotation: self.rotation,
            translation: self.translation,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoFile {
    managers: BTreeMap<String, GeoNode>,
}

/// A geometry model: the root node of one named manager tree.
#[derive(Debug, Clone)]
pub struct GeoModel {
    /// Root of the volume tree.
    pub root: GeoNode,
}

impl GeoModel {
    /// Opens a geometry model file and extracts the named manager.
    ///
    /// A missing file, unreadable content or absent manager is logged and
    /// yields `None`; callers degrade to an empty volume index.
    #[must_use]
    pub fn open(path: &Path, manager_name: &str) -> Option<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                error!("can't open geometry file {}: {err}", path.display());
                return None;
            }
        };

        let parsed: GeoFile = match serde_json::from_reader(BufReader::new(file)) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!("can't parse geometry file {}: {err}", path.display());
                return None;
            }
        };

        match parsed.managers.get(manager_name) {
            Some(root) => Some(Self { root: root.clone() }),
            None => {
                error!("can't find geometry manager {manager_name} in {}", path.display());
                None
            }
        }
    }
}
