//! Multi-instance event orchestration.

use std::sync::Arc;

use log::{info, warn};
use ndreco_core::ContextParameters;
use ndreco_geometry::{drift_gaps, GeometryBuilder, VolumeIndex};

use crate::error::{Error, Result};
use crate::event_input::EventInput;
use crate::framework::{FrameworkFactory, Pfo, RecoFramework};

/// Setup progresses strictly through these stages before events can be
/// processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetupStage {
    Created,
    GeometryBuilt,
    Configured,
    InputsBound,
}

impl SetupStage {
    fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::GeometryBuilt => "GeometryBuilt",
            Self::Configured => "Configured",
            Self::InputsBound => "InputsBound",
        }
    }
}

struct DaughterContext {
    name: String,
    params: ContextParameters,
    framework: Box<dyn RecoFramework>,
    geometry: VolumeIndex,
    input: Option<EventInput>,
}

/// The main aggregate captured for one processed event, taken after the
/// main instance ran and before the per-event reset.
pub struct EventSummary {
    /// Index of the processed event.
    pub event_index: usize,
    /// Last hit identifier assigned across all daughters.
    pub last_hit_id: i64,
    /// The main context's output objects, by handle.
    pub pfos: Vec<Arc<Pfo>>,
}

/// Owns one main aggregation context plus N named daughter contexts and
/// sequences their setup and per-event processing.
///
/// Daughters are always visited in insertion order, during setup and
/// during processing alike: the global hit-identifier counter and the
/// order outputs are copied into the main aggregate both depend on it.
/// Name lookups resolve to the first daughter registered with the name;
/// registering a second context under an existing name is rejected.
pub struct EventOrchestrator {
    main_name: String,
    main_params: ContextParameters,
    main: Box<dyn RecoFramework>,
    daughters: Vec<DaughterContext>,
    factory: Box<dyn FrameworkFactory>,
    stage: SetupStage,
}

fn feed_daughter(
    input: &EventInput,
    event: usize,
    hit_counter: i64,
    track_counter: i64,
    own: &mut dyn RecoFramework,
    main: &mut dyn RecoFramework,
) -> Result<(i64, i64)> {
    input.create_particles(event, own)?;
    let last_hit = input.create_hits(event, hit_counter, own, main)?;
    let last_track = input.create_tracks(event, track_counter, own, main)?;
    Ok((last_hit, last_track))
}

impl EventOrchestrator {
    /// Creates the orchestrator and its main context.
    ///
    /// # Errors
    ///
    /// Fails when the main parameters are invalid or the factory cannot
    /// create the main framework instance.
    pub fn new(
        main_name: &str,
        main_params: ContextParameters,
        factory: Box<dyn FrameworkFactory>,
    ) -> Result<Self> {
        main_params.validate()?;
        let main = factory.create(main_name, &main_params)?;
        Ok(Self {
            main_name: main_name.to_string(),
            main_params,
            main,
            daughters: Vec::new(),
            factory,
            stage: SetupStage::Created,
        })
    }

    fn require(&self, operation: &'static str, required: SetupStage) -> Result<()> {
        if self.stage == required {
            Ok(())
        } else {
            Err(Error::SetupOrder {
                operation,
                required: required.as_str(),
                current: self.stage.as_str(),
            })
        }
    }

    /// Registers a new daughter context.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate name, invalid parameters, out-of-order use
    /// or a framework creation failure.
    pub fn add_daughter(&mut self, name: &str, params: ContextParameters) -> Result<()> {
        self.require("add_daughter", SetupStage::Created)?;
        if name == self.main_name || self.daughters.iter().any(|d| d.name == name) {
            return Err(Error::DuplicateContext(name.to_string()));
        }
        params.validate()?;

        let framework = self.factory.create(name, &params)?;
        self.daughters.push(DaughterContext {
            name: name.to_string(),
            params,
            framework,
            geometry: VolumeIndex::new(),
            input: None,
        });
        Ok(())
    }

    /// Builds each daughter's volume geometry, assigning globally unique
    /// volume ids with a running offset, and registers the volumes and
    /// inter-volume gaps with the daughter frameworks.
    ///
    /// A volume or gap that fails to register is logged and simply
    /// absent from that instance; a missing geometry source leaves the
    /// daughter with an empty index.
    ///
    /// # Errors
    ///
    /// Fails when called out of setup order.
    pub fn build_geometry(&mut self) -> Result<()> {
        self.require("build_geometry", SetupStage::Created)?;

        let mut id_offset = 0i32;
        for daughter in &mut self.daughters {
            let builder = GeometryBuilder::from_file(
                &daughter.params.geometry_file,
                &daughter.params.geometry_manager,
                f64::from(daughter.params.length_scale),
            );
            let index = builder.build(&daughter.params.volume_name, id_offset);
            info!("created {} volumes for {}", index.len(), daughter.name);
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            {
                id_offset += index.len() as i32;
            }

            for volume in index.iter() {
                if let Err(err) = daughter.framework.create_volume(volume) {
                    warn!(
                        "failed to register volume {} with {}: {err}",
                        volume.id, daughter.name
                    );
                }
            }
            for gap in drift_gaps(&index) {
                if let Err(err) = daughter.framework.create_gap(&gap) {
                    warn!("failed to register gap with {}: {err}", daughter.name);
                }
            }

            daughter.geometry = index;
        }

        self.stage = SetupStage::GeometryBuilt;
        Ok(())
    }

    /// Pushes the steering flags and loads the settings file for every
    /// context, main first, then daughters in insertion order.
    ///
    /// # Errors
    ///
    /// Framework-reported failures escalate and abort the run.
    pub fn configure(&mut self) -> Result<()> {
        self.require("configure", SetupStage::GeometryBuilt)?;

        self.main.configure(&self.main_params.flags)?;
        self.main.load_settings(&self.main_params.settings_file)?;
        for daughter in &mut self.daughters {
            daughter.framework.configure(&daughter.params.flags)?;
            daughter.framework.load_settings(&daughter.params.settings_file)?;
        }

        self.stage = SetupStage::Configured;
        Ok(())
    }

    /// Constructs the event-input adapter for every daughter.
    ///
    /// # Errors
    ///
    /// Fails when called out of setup order.
    pub fn bind_inputs(&mut self) -> Result<()> {
        self.require("bind_inputs", SetupStage::Configured)?;

        for daughter in &mut self.daughters {
            let input = EventInput::new(daughter.params.clone(), daughter.geometry.clone());
            info!("bound event input for {} ({} events)", daughter.name, input.n_events());
            daughter.input = Some(input);
        }

        self.stage = SetupStage::InputsBound;
        Ok(())
    }

    /// Processes the half-open event range `start..end`.
    ///
    /// Per event and daughter, in insertion order: truth particles are
    /// created, then hits and tracks under one running identifier
    /// counter shared across all daughters, then the daughter instance
    /// runs and its outputs are copied into the main aggregate by
    /// handle. After all daughters the main instance runs, the aggregate
    /// is captured, and every context is reset so the next event starts
    /// from clean object lists.
    ///
    /// An event-input failure for one daughter is a local abort: that
    /// daughter contributes nothing for the event and the run continues.
    ///
    /// # Errors
    ///
    /// Framework processing/reset failures escalate immediately and
    /// abort the run.
    pub fn process_events(&mut self, start: usize, end: usize) -> Result<Vec<EventSummary>> {
        self.require("process_events", SetupStage::InputsBound)?;

        let mut summaries = Vec::new();
        for event in start..end {
            info!("processing event {event}");
            let mut hit_counter = 0i64;
            let mut track_counter = 0i64;

            for daughter in &mut self.daughters {
                let Some(input) = daughter.input.as_ref() else {
                    warn!("no event input bound for {}", daughter.name);
                    continue;
                };

                match feed_daughter(
                    input,
                    event,
                    hit_counter,
                    track_counter,
                    daughter.framework.as_mut(),
                    self.main.as_mut(),
                ) {
                    Ok((last_hit, last_track)) => {
                        hit_counter = last_hit;
                        track_counter = last_track;
                    }
                    Err(err) => {
                        warn!(
                            "event input failed for {} on event {event}: {err}; \
                             the daughter contributes nothing",
                            daughter.name
                        );
                        continue;
                    }
                }

                daughter.framework.process_event()?;
                self.main.adopt_pfos(daughter.framework.current_pfos());
            }

            self.main.process_event()?;
            summaries.push(EventSummary {
                event_index: event,
                last_hit_id: hit_counter,
                pfos: self.main.current_pfos().to_vec(),
            });

            for daughter in &mut self.daughters {
                daughter.framework.reset()?;
            }
            self.main.reset()?;
        }

        Ok(summaries)
    }

    /// Returns the name of the main context.
    #[must_use]
    pub fn main_name(&self) -> &str {
        &self.main_name
    }

    /// Returns the main context's parameters.
    #[must_use]
    pub fn main_parameters(&self) -> &ContextParameters {
        &self.main_params
    }

    /// Returns the daughter names in insertion order.
    pub fn daughter_names(&self) -> impl Iterator<Item = &str> {
        self.daughters.iter().map(|d| d.name.as_str())
    }

    /// Looks up a context's parameters by name.
    ///
    /// # Errors
    ///
    /// Fails when no context carries the name.
    pub fn parameters(&self, name: &str) -> Result<&ContextParameters> {
        if name == self.main_name {
            return Ok(&self.main_params);
        }
        self.daughter(name).map(|d| &d.params)
    }

    /// Looks up a daughter's volume geometry by name.
    ///
    /// # Errors
    ///
    /// Fails when no daughter carries the name.
    pub fn geometry(&self, name: &str) -> Result<&VolumeIndex> {
        self.daughter(name).map(|d| &d.geometry)
    }

    /// Looks up a daughter's event input by name.
    ///
    /// # Errors
    ///
    /// Fails when no daughter carries the name or inputs are not bound.
    pub fn input(&self, name: &str) -> Result<&EventInput> {
        self.daughter(name)?
            .input
            .as_ref()
            .ok_or_else(|| Error::UnknownContext(name.to_string()))
    }

    /// Returns the largest event count over all bound inputs.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.daughters
            .iter()
            .filter_map(|d| d.input.as_ref())
            .map(EventInput::n_events)
            .max()
            .unwrap_or(0)
    }

    fn daughter(&self, name: &str) -> Result<&DaughterContext> {
        // First match in insertion order.
        self.daughters
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| Error::UnknownContext(name.to_string()))
    }
}
