#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Streamer
//!
//! Streams an effectively infinite voxel world around a moving viewpoint: chunks are
//! generated procedurally on background workers, turned into greedy-meshed render and
//! collision geometry, and handed to render and physics collaborators on the main thread
//! under a fixed per-frame budget.
//!
//! ## Key Modules
//!
//! * `core` - Shared concurrency primitives
//! * `engine_state` - Chunk storage, generation, meshing, the scheduler and the frame driver
//!
//! ## Architecture
//!
//! * `WorldStore` is the single source of truth for chunk data
//! * `ChunkScheduler` owns the worker pool and the generation, mesh and upload queues
//! * `EngineState` polls a `ViewpointSource` once per frame and feeds a `RenderSink` and
//!   a `PhysicsSink`
//!
//! Drawing and physics simulation live outside this crate behind those sink traits.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxel_streamer::run();
//! }
//! ```

use cgmath::Point3;
use log::{error, info};
use web_time::{Duration, Instant};

use engine_state::{
    camera_state::ScriptedViewpoint,
    config::WorldConfig,
    rendering::sinks::{LoggingPhysicsSink, LoggingRenderSink},
    EngineState,
};

pub mod core;
pub mod engine_state;

/// Number of frames the headless fly-through spends moving.
const FLIGHT_FRAMES: usize = 240;
/// Upper bound on frames spent waiting for the world to settle after the flight.
const SETTLE_FRAMES: usize = 2_000;
/// Target frame time of the headless loop.
const FRAME_TIME: Duration = Duration::from_millis(16);

/// Runs a headless fly-through with logging sinks.
///
/// The first command-line argument, if present, names a JSON configuration file.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path);
                config
            }
            Err(err) => {
                error!("Could not load {}: {}, using defaults", path, err);
                WorldConfig::default()
            }
        },
        None => WorldConfig::default(),
    };

    let start = Point3::new(8.0, 24.0, 8.0);
    let end = Point3::new(8.0 + 16.0 * 6.0, 24.0, 8.0 + 16.0 * 3.0);
    let viewpoint = ScriptedViewpoint::fly_through(start, end, FLIGHT_FRAMES);

    let mut engine = match EngineState::new(
        config,
        viewpoint,
        LoggingRenderSink::default(),
        LoggingPhysicsSink::default(),
    ) {
        Ok(engine) => engine,
        Err(err) => {
            error!("Could not start the streamer: {}", err);
            return;
        }
    };

    let session = Instant::now();
    for frame in 0..FLIGHT_FRAMES + SETTLE_FRAMES {
        let frame_start = Instant::now();
        engine.frame();
        if frame >= FLIGHT_FRAMES && engine.scheduler().is_settled() {
            break;
        }
        if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    let stats = engine.scheduler().stats();
    info!(
        "Streamed {} chunks in {:?}: {} meshes ({} quads) delivered, {} colliders attached, \
         {} stale results discarded",
        stats.published,
        session.elapsed(),
        engine.render_sink().uploads,
        engine.render_sink().quads,
        engine.physics_sink().attached,
        stats.discarded_stale
    );

    engine.shutdown();
}
