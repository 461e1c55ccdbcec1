//! On-disk event records.
//!
//! An event file holds the raw per-event branches an event-input adapter
//! reads: space-point hits and, for truth formats, neutrino interactions
//! and the truth particle hierarchy.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::error;
use serde::Deserialize;

/// One raw hit sample.
#[derive(Debug, Clone, Deserialize)]
pub struct HitRecord {
    /// X coordinate in file units.
    pub x: f32,
    /// Y coordinate in file units.
    pub y: f32,
    /// Z coordinate in file units.
    pub z: f32,
    /// Deposited charge or energy in file units.
    pub energy: f32,
    /// File ids of the truth particles contributing to this hit.
    #[serde(default)]
    pub contrib_ids: Vec<i64>,
    /// Energy fractions contributed, parallel to `contrib_ids`.
    #[serde(default)]
    pub contrib_fractions: Vec<f32>,
}

/// One true neutrino interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NeutrinoRecord {
    /// Unique interaction vertex identifier.
    pub vertex_id: i64,
    /// Neutrino PDG code.
    pub pdg: i32,
    /// Charged-current (0) or neutral-current (1) flag.
    pub ccnc: i32,
    /// Interaction mode code.
    pub mode: i32,
    /// Neutrino energy in file units.
    pub energy: f32,
    /// Momentum components.
    #[serde(default)]
    pub momentum: [f32; 3],
    /// Interaction vertex in file units.
    pub vertex: [f32; 3],
}

/// One truth particle, with file-scoped identifiers.
#[derive(Debug, Clone, Deserialize)]
pub struct ParticleRecord {
    /// Unique file-based identifier.
    pub id: i64,
    /// Identifier of the owning interaction vertex.
    pub vertex_id: i64,
    /// Per-vertex local identifier.
    pub local_id: i64,
    /// Parent's per-vertex local identifier, -1 for primaries.
    pub parent_local_id: i64,
    /// PDG code.
    pub pdg: i32,
    /// Total energy in file units.
    pub energy: f32,
    /// Momentum components.
    #[serde(default)]
    pub momentum: [f32; 3],
    /// Creation point in file units.
    pub start: [f32; 3],
    /// End point in file units.
    pub end: [f32; 3],
}

/// One event's branches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventRecord {
    /// Raw hits.
    pub hits: Vec<HitRecord>,
    /// True neutrino interactions.
    pub neutrinos: Vec<NeutrinoRecord>,
    /// Truth particles.
    pub particles: Vec<ParticleRecord>,
}

/// A loaded event file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFile {
    /// The events, in file order.
    pub events: Vec<EventRecord>,
}

impl EventFile {
    /// Opens an event file.
    ///
    /// A missing or unreadable file is logged and yields an empty file,
    /// so the owning adapter simply creates nothing.
    #[must_use]
    pub fn open(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                error!("can't open event file {}: {err}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(parsed) => parsed,
            Err(err) => {
                error!("can't parse event file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Returns the event at `index`, if present.
    #[must_use]
    pub fn event(&self, index: usize) -> Option<&EventRecord> {
        self.events.get(index)
    }

    /// Returns the number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the file holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_event_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{"events": [{"hits": [{"x": 1.0, "y": 2.0, "z": 3.0, "energy": 0.5}]}]}"#,
        )
        .unwrap();

        let events = EventFile::open(file.path());
        assert_eq!(events.len(), 1);
        let record = events.event(0).unwrap();
        assert_eq!(record.hits.len(), 1);
        assert!(record.neutrinos.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let events = EventFile::open(Path::new("/no/such/events.json"));
        assert!(events.is_empty());
        assert!(events.event(0).is_none());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(EventFile::open(file.path()).is_empty());
    }
}
