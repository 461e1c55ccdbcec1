//! Built-in clustering reconstruction framework.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use ndreco_algorithms::{ClusterConfig, SimpleClustering};
use ndreco_core::{
    ContextParameters, CreationOutcome, Hit, HitView, Neutrino, Particle, SteeringFlags,
};
use ndreco_geometry::{Aabb, Volume, VolumeIndex};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::framework::{FrameworkFactory, Pfo, RecoFramework, Track};

/// Settings file content for a [`ClusterReco`] instance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RecoSettings {
    /// Unsquared clustering window override.
    clustering_window: Option<f32>,
}

/// A reconstruction framework whose pattern recognition is first-pass
/// spatial clustering: processing an event groups the instance's 3D hits
/// into connected clusters and emits one output object per cluster.
pub struct ClusterReco {
    name: String,
    use_3d: bool,
    flags: SteeringFlags,
    clustering: SimpleClustering,
    volumes: VolumeIndex,
    gaps: Vec<Aabb>,
    hits: Vec<Hit>,
    hit_ids: HashSet<i64>,
    neutrinos: Vec<Neutrino>,
    particles: Vec<Particle>,
    particle_ids: HashSet<i64>,
    tracks: Vec<Track>,
    truth_links: Vec<(i64, i64, f32)>,
    pfos: Vec<Arc<Pfo>>,
}

impl ClusterReco {
    /// Creates a named instance. The 3D flag selects whether the
    /// clustering pass runs at all; an instance created without it only
    /// aggregates adopted outputs.
    #[must_use]
    pub fn new(name: &str, use_3d: bool) -> Self {
        info!("creating reconstruction instance {name}");
        Self {
            name: name.to_string(),
            use_3d,
            flags: SteeringFlags::default(),
            clustering: SimpleClustering::default(),
            volumes: VolumeIndex::new(),
            gaps: Vec::new(),
            hits: Vec::new(),
            hit_ids: HashSet::new(),
            neutrinos: Vec::new(),
            particles: Vec::new(),
            particle_ids: HashSet::new(),
            tracks: Vec::new(),
            truth_links: Vec::new(),
            pfos: Vec::new(),
        }
    }

    /// Returns the hits currently staged for this event.
    #[must_use]
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// Returns the truth particles staged for this event.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Returns the registered volumes.
    #[must_use]
    pub fn volumes(&self) -> &VolumeIndex {
        &self.volumes
    }

    /// Returns the hit-to-particle truth relations staged for this event.
    #[must_use]
    pub fn truth_links(&self) -> &[(i64, i64, f32)] {
        &self.truth_links
    }

    /// Returns the registered inter-volume gaps.
    #[must_use]
    pub fn gaps(&self) -> &[Aabb] {
        &self.gaps
    }

    /// Returns the truth neutrinos staged for this event.
    #[must_use]
    pub fn neutrinos(&self) -> &[Neutrino] {
        &self.neutrinos
    }

    /// Returns the tracks staged for this event.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Returns the steering flags pushed during configuration.
    #[must_use]
    pub fn flags(&self) -> &SteeringFlags {
        &self.flags
    }
}

impl RecoFramework for ClusterReco {
    fn name(&self) -> &str {
        &self.name
    }

    fn configure(&mut self, flags: &SteeringFlags) -> Result<()> {
        self.flags = *flags;
        Ok(())
    }

    fn load_settings(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path).map_err(|err| {
            Error::Framework(format!("can't open settings file {}: {err}", path.display()))
        })?;
        let settings: RecoSettings = serde_json::from_reader(BufReader::new(file))
            .map_err(|err| {
                Error::Framework(format!("can't parse settings file {}: {err}", path.display()))
            })?;

        if let Some(window) = settings.clustering_window {
            self.clustering = SimpleClustering::new(ClusterConfig::with_window(window));
        }
        Ok(())
    }

    fn create_volume(&mut self, volume: &Volume) -> Result<()> {
        self.volumes.add_volume(volume.bounds, volume.id);
        Ok(())
    }

    fn create_gap(&mut self, gap: &Aabb) -> Result<()> {
        self.gaps.push(*gap);
        Ok(())
    }

    fn create_hit(&mut self, hit: Hit) -> Result<CreationOutcome> {
        if !hit.is_valid() {
            warn!("{}: skipping hit {} with non-finite values", self.name, hit.id);
            return Ok(CreationOutcome::SkippedInvalid);
        }
        if !self.hit_ids.insert(hit.id) {
            warn!("{}: skipping hit with duplicate id {}", self.name, hit.id);
            return Ok(CreationOutcome::SkippedInvalid);
        }
        self.hits.push(hit);
        Ok(CreationOutcome::Created)
    }

    fn create_particle(&mut self, particle: Particle) -> Result<CreationOutcome> {
        if !particle.is_valid() {
            warn!(
                "{}: skipping particle {} with non-finite values",
                self.name, particle.id
            );
            return Ok(CreationOutcome::SkippedInvalid);
        }
        if !self.particle_ids.insert(particle.id) {
            warn!(
                "{}: skipping particle with duplicate id {}",
                self.name, particle.id
            );
            return Ok(CreationOutcome::SkippedInvalid);
        }
        self.particles.push(particle);
        Ok(CreationOutcome::Created)
    }

    fn create_neutrino(&mut self, neutrino: Neutrino) -> Result<CreationOutcome> {
        self.neutrinos.push(neutrino);
        Ok(CreationOutcome::Created)
    }

    fn create_track(&mut self, track: Track) -> Result<CreationOutcome> {
        self.tracks.push(track);
        Ok(CreationOutcome::Created)
    }

    fn set_hit_truth(&mut self, hit_id: i64, particle_id: i64, fraction: f32) -> Result<()> {
        self.truth_links.push((hit_id, particle_id, fraction));
        Ok(())
    }

    fn process_event(&mut self) -> Result<()> {
        if !self.use_3d {
            debug!("{}: 3D pass disabled, keeping adopted outputs only", self.name);
            return Ok(());
        }

        let three_d: Vec<Hit> = self
            .hits
            .iter()
            .copied()
            .filter(|h| h.view == HitView::ThreeD)
            .collect();
        info!("{}: making clusters from {} 3D hits", self.name, three_d.len());

        let clusters = self.clustering.cluster(&three_d);
        for cluster in clusters {
            let energy = cluster.total_energy();
            self.pfos.push(Arc::new(Pfo {
                source: self.name.clone(),
                cluster,
                energy,
            }));
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.hits.clear();
        self.hit_ids.clear();
        self.neutrinos.clear();
        self.particles.clear();
        self.particle_ids.clear();
        self.tracks.clear();
        self.truth_links.clear();
        self.pfos.clear();
        Ok(())
    }

    fn current_pfos(&self) -> &[Arc<Pfo>] {
        &self.pfos
    }

    fn adopt_pfos(&mut self, pfos: &[Arc<Pfo>]) {
        self.pfos.extend(pfos.iter().map(Arc::clone));
    }
}

/// Factory for the built-in clustering framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterRecoFactory;

impl FrameworkFactory for ClusterRecoFactory {
    fn create(&self, name: &str, params: &ContextParameters) -> Result<Box<dyn RecoFramework>> {
        Ok(Box::new(ClusterReco::new(name, params.use_3d)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndreco_core::Point3;
    use std::io::Write;

    fn hit(id: i64, z: f32) -> Hit {
        Hit::new(id, Point3::new(0.0, 0.0, z), 1.0, 0)
    }

    #[test]
    fn test_process_emits_one_pfo_per_cluster() {
        let mut reco = ClusterReco::new("Test", true);
        reco.create_hit(hit(1, 0.0)).unwrap();
        reco.create_hit(hit(2, 0.3)).unwrap();
        reco.create_hit(hit(3, 10.0)).unwrap();
        reco.process_event().unwrap();
        assert_eq!(reco.current_pfos().len(), 2);
    }

    #[test]
    fn test_duplicate_hit_id_is_skipped() {
        let mut reco = ClusterReco::new("Test", true);
        assert!(reco.create_hit(hit(1, 0.0)).unwrap().is_created());
        assert!(!reco.create_hit(hit(1, 5.0)).unwrap().is_created());
        assert_eq!(reco.hits().len(), 1);
    }

    #[test]
    fn test_invalid_hit_is_skipped() {
        let mut reco = ClusterReco::new("Test", true);
        let bad = Hit::new(1, Point3::new(f32::NAN, 0.0, 0.0), 1.0, 0);
        assert!(!reco.create_hit(bad).unwrap().is_created());
    }

    #[test]
    fn test_reset_clears_event_state_but_not_geometry() {
        let mut reco = ClusterReco::new("Test", true);
        reco.create_volume(&Volume::new(0, Aabb::new(0.0, 1.0, 0.0, 1.0, 0.0, 1.0)))
            .unwrap();
        reco.create_gap(&Aabb::new(1.0, 2.0, 0.0, 1.0, 0.0, 1.0)).unwrap();
        reco.create_hit(hit(1, 0.0)).unwrap();
        reco.process_event().unwrap();
        reco.reset().unwrap();

        assert!(reco.hits().is_empty());
        assert!(reco.current_pfos().is_empty());
        assert_eq!(reco.volumes().len(), 1);
        assert_eq!(reco.gaps().len(), 1);
        // The same id is usable again in the next event.
        assert!(reco.create_hit(hit(1, 0.0)).unwrap().is_created());
    }

    #[test]
    fn test_adopted_pfos_precede_own() {
        let mut daughter = ClusterReco::new("D", true);
        daughter.create_hit(hit(1, 0.0)).unwrap();
        daughter.process_event().unwrap();

        let mut main = ClusterReco::new("Main", true);
        main.create_hit(hit(1, 0.0)).unwrap();
        main.adopt_pfos(daughter.current_pfos());
        main.process_event().unwrap();

        let pfos = main.current_pfos();
        assert_eq!(pfos.len(), 2);
        assert_eq!(pfos[0].source, "D");
        assert_eq!(pfos[1].source, "Main");
    }

    #[test]
    fn test_settings_window_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"clustering_window": 2.0}"#).unwrap();

        let mut reco = ClusterReco::new("Test", true);
        reco.load_settings(file.path()).unwrap();
        // 1.0 apart: outside the default window, inside the widened one.
        reco.create_hit(hit(1, 0.0)).unwrap();
        reco.create_hit(hit(2, 1.0)).unwrap();
        reco.process_event().unwrap();
        assert_eq!(reco.current_pfos().len(), 1);
    }

    #[test]
    fn test_missing_settings_is_fatal() {
        let mut reco = ClusterReco::new("Test", true);
        assert!(reco.load_settings(Path::new("/no/such/settings.json")).is_err());
    }

    #[test]
    fn test_without_3d_pass() {
        let mut reco = ClusterReco::new("Test", false);
        reco.create_hit(hit(1, 0.0)).unwrap();
        reco.process_event().unwrap();
        assert!(reco.current_pfos().is_empty());
    }
}
