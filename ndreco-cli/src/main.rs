//!
//! Command-line driver for near-detector event assembly and clustering.
#![allow(clippy::uninlined_format_args, clippy::cast_precision_loss)]

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use serde::Deserialize;
use thiserror::Error;

use ndreco_core::ContextParameters;
use ndreco_geometry::GeometryBuilder;
use ndreco_pipeline::{ClusterRecoFactory, EventOrchestrator};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] ndreco_pipeline::Error),
}

/// One named context entry in the run configuration.
#[derive(Debug, Deserialize)]
struct NamedContext {
    /// Context name, unique across the run.
    name: String,
    /// Steering parameters for the context.
    #[serde(flatten)]
    params: ContextParameters,
}

/// The full run configuration: one main context plus its daughters.
#[derive(Debug, Deserialize)]
struct RunConfig {
    main: NamedContext,
    #[serde(default)]
    daughters: Vec<NamedContext>,
}

/// Near-detector event assembly and spatial clustering.
#[derive(Parser)]
#[command(name = "ndreco")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process events through all configured reconstruction contexts
    Run {
        /// Run configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// First event index to process
        #[arg(long, default_value = "0")]
        start: usize,

        /// Number of events to process (default: all available)
        #[arg(short, long)]
        nevents: Option<usize>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Inspect the volumes extracted from a geometry model file
    GeomInfo {
        /// Geometry model file (JSON)
        #[arg(short, long)]
        geometry: PathBuf,

        /// Geometry manager name inside the model file
        #[arg(short, long)]
        manager: String,

        /// Substring identifying the sensitive volume nodes
        #[arg(long)]
        volume_name: String,

        /// Scale factor bringing all lengths to cm
        #[arg(long, default_value = "1.0")]
        length_scale: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            start,
            nevents,
            verbose,
        } => {
            let default_level = if verbose { "info" } else { "warn" };
            env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(default_level),
            )
            .init();

            let file = File::open(&config)?;
            let run: RunConfig = serde_json::from_reader(BufReader::new(file))?;

            let mut orchestrator = EventOrchestrator::new(
                &run.main.name,
                run.main.params,
                Box::new(ClusterRecoFactory),
            )?;
            for daughter in run.daughters {
                orchestrator.add_daughter(&daughter.name, daughter.params)?;
            }

            orchestrator.build_geometry()?;
            orchestrator.configure()?;
            orchestrator.bind_inputs()?;

            let available = orchestrator.event_count();
            let end = match nevents {
                Some(n) => (start + n).min(available),
                None => available,
            };
            info!("processing events {start}..{end} of {available}");

            let summaries = orchestrator.process_events(start, end)?;

            let mut total_pfos = 0usize;
            let mut total_hits = 0i64;
            for summary in &summaries {
                println!(
                    "event {}: {} pfos, {} hits",
                    summary.event_index,
                    summary.pfos.len(),
                    summary.last_hit_id
                );
                total_pfos += summary.pfos.len();
                total_hits += summary.last_hit_id;
            }
            println!("processed {} events", summaries.len());
            println!("total hits: {}", total_hits);
            println!("total pfos: {}", total_pfos);
        }

        Commands::GeomInfo {
            geometry,
            manager,
            volume_name,
            length_scale,
        } => {
            env_logger::init();

            let builder = GeometryBuilder::from_file(&geometry, &manager, length_scale);
            let index = builder.build(&volume_name, 0);

            println!("File: {}", geometry.display());
            println!("Volumes matching '{}': {}", volume_name, index.len());

            for volume in index.iter() {
                let b = volume.bounds;
                println!(
                    "  volume {:3} (module {:2}): x [{:.2}, {:.2}], y [{:.2}, {:.2}], z [{:.2}, {:.2}]",
                    volume.id,
                    volume.id / 2,
                    b.x_min,
                    b.x_max,
                    b.y_min,
                    b.y_max,
                    b.z_min,
                    b.z_max
                );
            }

            if let Some(b) = index.bounding_box() {
                println!(
                    "Enclosing box: x [{:.2}, {:.2}], y [{:.2}, {:.2}], z [{:.2}, {:.2}]",
                    b.x_min, b.x_max, b.y_min, b.y_max, b.z_min, b.z_max
                );
            } else {
                println!("No volumes found");
            }
        }
    }

    Ok(())
}
