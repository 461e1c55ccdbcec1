//! Event-input adapters.
//!
//! One adapter exists per detector technology, selected by the input
//! data format at bind time. Adapters read raw per-event records, tag
//! each position with its detector volume, and create the resulting
//! objects into both their own framework instance and the main
//! aggregating instance, threading the caller's running identifier
//! counter so hit ids stay unique across all daughters of one event.

use std::collections::HashMap;

use log::{info, warn};
use ndreco_core::views::{yz_to_u, yz_to_v, yz_to_w};
use ndreco_core::{
    reaction, ContextParameters, DataFormat, Hit, HitView, Neutrino, Particle, Point3,
};
use ndreco_geometry::VolumeIndex;

use crate::error::Result;
use crate::event_file::{EventFile, EventRecord, HitRecord};
use crate::framework::RecoFramework;

/// A bound event-input adapter.
///
/// A closed set of detector variants; extending to a new technology
/// means adding a variant here and a branch to the format match in
/// [`EventInput::new`].
pub enum EventInput {
    /// Liquid-argon space-point input, with or without truth.
    LArNd(LArNdInput),
    /// Muon-spectrometer input; containment ignores the y axis.
    Tms(TmsInput),
}

impl EventInput {
    /// Binds an adapter for the given parameters and geometry partition.
    #[must_use]
    pub fn new(params: ContextParameters, geometry: VolumeIndex) -> Self {
        match params.data_format {
            DataFormat::Sp | DataFormat::SpMc => Self::LArNd(LArNdInput::new(params, geometry)),
            DataFormat::TmsMc => Self::Tms(TmsInput::new(params, geometry)),
        }
    }

    /// Returns the number of events available.
    #[must_use]
    pub fn n_events(&self) -> usize {
        match self {
            Self::LArNd(input) => input.events.len(),
            Self::Tms(input) => input.events.len(),
        }
    }

    /// Returns the bound parameters.
    #[must_use]
    pub fn parameters(&self) -> &ContextParameters {
        match self {
            Self::LArNd(input) => &input.params,
            Self::Tms(input) => &input.params,
        }
    }

    /// Creates the truth records for one event into the daughter's own
    /// instance.
    ///
    /// # Errors
    ///
    /// Propagates unexpected framework failures; routinely invalid
    /// particles are skipped.
    pub fn create_particles(&self, event: usize, own: &mut dyn RecoFramework) -> Result<()> {
        match self {
            Self::LArNd(input) => input.create_particles(event, own),
            Self::Tms(_) => Ok(()),
        }
    }

    /// Creates the hits for one event, assigning identifiers
    /// `start_id + 1 ..= last_id` and returning `last_id`.
    ///
    /// # Errors
    ///
    /// Propagates unexpected framework failures; invalid hit records are
    /// skipped without consuming an identifier.
    pub fn create_hits(
        &self,
        event: usize,
        start_id: i64,
        own: &mut dyn RecoFramework,
        main: &mut dyn RecoFramework,
    ) -> Result<i64> {
        match self {
            Self::LArNd(input) => input.create_hits(event, start_id, own, main),
            Self::Tms(input) => input.create_hits(event, start_id, own, main),
        }
    }

    /// Creates the tracks for one event under the same running counter
    /// discipline as [`EventInput::create_hits`].
    ///
    /// # Errors
    ///
    /// Propagates unexpected framework failures.
    pub fn create_tracks(
        &self,
        _event: usize,
        start_id: i64,
        _own: &mut dyn RecoFramework,
        _main: &mut dyn RecoFramework,
    ) -> Result<i64> {
        // Neither variant produces track objects.
        Ok(start_id)
    }
}

/// Shared hit construction: scale, validate, volume-tag and fan out one
/// raw record to the 3D hit and its wire-plane views.
#[allow(clippy::too_many_arguments)]
fn build_hits(
    params: &ContextParameters,
    geometry: &VolumeIndex,
    ignore_y: bool,
    record: &EventRecord,
    start_id: i64,
    own: &mut dyn RecoFramework,
    main: &mut dyn RecoFramework,
    with_truth: bool,
) -> Result<i64> {
    let mut counter = start_id;

    for (isp, raw) in record.hits.iter().enumerate() {
        let x = raw.x * params.length_scale;
        let y = raw.y * params.length_scale;
        let z = raw.z * params.length_scale;
        let energy = raw.energy * params.energy_scale;

        let position = Point3::new(x, y, z);
        if !position.is_finite() || !energy.is_finite() {
            warn!("ignoring hit {isp} which contains non-finite values");
            continue;
        }

        let volume_id = geometry.volume_id_at(position, ignore_y).unwrap_or(0);
        let truth = if with_truth {
            biggest_contributor(raw)
        } else {
            None
        };

        counter += 1;
        let hit = Hit::new(counter, position, energy, volume_id);

        if params.use_3d {
            main.create_hit(hit)?;
            own.create_hit(hit)?;
            if let Some((particle_id, fraction)) = truth {
                main.set_hit_truth(counter, particle_id, fraction)?;
                own.set_hit_truth(counter, particle_id, fraction)?;
            }
        }

        if params.use_wire_views {
            // x is the common drift coordinate for every view.
            let projections = [
                (HitView::U, yz_to_u(y, z)),
                (HitView::V, yz_to_v(y, z)),
                (HitView::W, yz_to_w(y, z)),
            ];
            for (view, pitch) in projections {
                counter += 1;
                let view_hit = hit.with_view(counter, view, Point3::new(x, 0.0, pitch));
                main.create_hit(view_hit)?;
                own.create_hit(view_hit)?;
                if let Some((particle_id, fraction)) = truth {
                    main.set_hit_truth(counter, particle_id, fraction)?;
                    own.set_hit_truth(counter, particle_id, fraction)?;
                }
            }
        }
    }

    info!("start id = {start_id}, last id = {counter}");
    Ok(counter)
}

/// Picks the truth particle contributing the largest energy fraction,
/// normalising the fractions since merged hits can sum to more than one.
fn biggest_contributor(raw: &HitRecord) -> Option<(i64, f32)> {
    let (index, &largest) = raw
        .contrib_fractions
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;

    let particle_id = raw.contrib_ids.get(index).copied().unwrap_or(0);
    let sum: f32 = raw.contrib_fractions.iter().sum();
    let fraction = if sum.abs() > 0.0 {
        (largest / sum).min(1.0)
    } else {
        0.0
    };

    Some((particle_id, fraction))
}

/// Liquid-argon space-point adapter.
pub struct LArNdInput {
    params: ContextParameters,
    geometry: VolumeIndex,
    events: EventFile,
}

impl LArNdInput {
    fn new(params: ContextParameters, geometry: VolumeIndex) -> Self {
        let events = EventFile::open(&params.input_file);
        info!(
            "constructed LArND input for {}: {} events",
            params.input_file.display(),
            events.len()
        );
        Self {
            params,
            geometry,
            events,
        }
    }

    fn create_particles(&self, event: usize, own: &mut dyn RecoFramework) -> Result<()> {
        if self.params.data_format != DataFormat::SpMc {
            return Ok(());
        }
        let Some(record) = self.events.event(event) else {
            return Ok(());
        };

        info!("read in {} true neutrinos", record.neutrinos.len());

        // Reaction codes per vertex, needed again for the particles.
        let mut vertex_codes: HashMap<i64, i32> = HashMap::new();
        for nu in &record.neutrinos {
            let reaction_name = reaction::nuance_reaction(nu.ccnc, nu.mode);
            let code = reaction::nuance_code(&reaction_name);
            vertex_codes.insert(nu.vertex_id, code);

            own.create_neutrino(Neutrino {
                vertex_id: nu.vertex_id,
                pdg: nu.pdg,
                ccnc: nu.ccnc,
                mode: nu.mode,
                nuance_code: code,
                energy: nu.energy * self.params.energy_scale,
                momentum: nu.momentum,
                vertex: Point3::new(
                    nu.vertex[0] * self.params.length_scale,
                    nu.vertex[1] * self.params.length_scale,
                    nu.vertex[2] * self.params.length_scale,
                ),
            })?;
        }

        // Unique file ids keyed by (vertex, local id), for resolving the
        // parent links, which are only stored as per-vertex local ids.
        let mut file_ids: HashMap<(i64, i64), i64> = HashMap::new();
        for p in &record.particles {
            file_ids.insert((p.vertex_id, p.local_id), p.id);
        }

        let mut n_skipped = 0usize;
        for p in &record.particles {
            let parent_id = if p.parent_local_id == -1 {
                p.vertex_id
            } else {
                file_ids
                    .get(&(p.vertex_id, p.parent_local_id))
                    .copied()
                    .unwrap_or(p.parent_local_id)
            };

            let scale = |v: [f32; 3]| {
                Point3::new(
                    v[0] * self.params.length_scale,
                    v[1] * self.params.length_scale,
                    v[2] * self.params.length_scale,
                )
            };

            let outcome = own.create_particle(Particle {
                id: p.id,
                vertex_id: p.vertex_id,
                parent_id,
                pdg: p.pdg,
                nuance_code: vertex_codes.get(&p.vertex_id).copied().unwrap_or(1000),
                energy: p.energy * self.params.energy_scale,
                momentum: [
                    p.momentum[0] * self.params.energy_scale,
                    p.momentum[1] * self.params.energy_scale,
                    p.momentum[2] * self.params.energy_scale,
                ],
                start: scale(p.start),
                end: scale(p.end),
            })?;
            if !outcome.is_created() {
                n_skipped += 1;
            }
        }
        if n_skipped > 0 {
            warn!("unable to create {n_skipped} truth particles: invalid info supplied");
        }
        Ok(())
    }

    fn create_hits(
        &self,
        event: usize,
        start_id: i64,
        own: &mut dyn RecoFramework,
        main: &mut dyn RecoFramework,
    ) -> Result<i64> {
        let Some(record) = self.events.event(event) else {
            return Ok(start_id);
        };

        let n_sp = record.hits.len();
        info!("event {event}: {n_sp} space points, start id {start_id}");

        // Event gates: too many hits, or too few to be worth processing.
        if self.params.max_n_hits > 0 && n_sp > self.params.max_n_hits.unsigned_abs() as usize {
            info!(
                "skipping event: number of space points {n_sp} > {}",
                self.params.max_n_hits
            );
            return Ok(start_id);
        }
        #[allow(clippy::cast_possible_wrap)]
        if self.params.min_n_hits > 0 && (n_sp as i64) < i64::from(self.params.min_n_hits) {
            info!(
                "skipping event: number of space points {n_sp} < {}",
                self.params.min_n_hits
            );
            return Ok(start_id);
        }

        let with_truth = self.params.data_format == DataFormat::SpMc;
        build_hits(
            &self.params,
            &self.geometry,
            false,
            record,
            start_id,
            own,
            main,
            with_truth,
        )
    }
}

/// Muon-spectrometer adapter. The detector is effectively 2D, so volume
/// containment ignores the y axis.
pub struct TmsInput {
    params: ContextParameters,
    geometry: VolumeIndex,
    events: EventFile,
}

impl TmsInput {
    fn new(params: ContextParameters, geometry: VolumeIndex) -> Self {
        let events = EventFile::open(&params.input_file);
        info!(
            "constructed TMS input for {}: {} events",
            params.input_file.display(),
            events.len()
        );
        Self {
            params,
            geometry,
            events,
        }
    }

    fn create_hits(
        &self,
        event: usize,
        start_id: i64,
        own: &mut dyn RecoFramework,
        main: &mut dyn RecoFramework,
    ) -> Result<i64> {
        let Some(record) = self.events.event(event) else {
            return Ok(start_id);
        };

        info!(
            "event {event}: {} TMS hits, start id {start_id}",
            record.hits.len()
        );
        build_hits(
            &self.params,
            &self.geometry,
            true,
            record,
            start_id,
            own,
            main,
            false,
        )
    }
}
