//! Simulation engine binary for Panopticon.
//!
//! This is the main entry point that wires together the starting world,
//! rule book, decision source, and operator controls. It loads
//! configuration, initializes all subsystems, and runs the simulation
//! loop until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `panopticon-config.yaml`
//! 3. Seed the RNG and create the starting world
//! 4. Register the default facility rules
//! 5. Create the decision source and event sink
//! 6. Create operator state
//! 7. Run the simulation loop
//! 8. Log the result

mod error;

use std::path::Path;
use std::sync::Arc;

use panopticon_core::config::SimulationConfig;
use panopticon_core::runner::{self, NoOpCallback};
use panopticon_core::tick::SimulationState;
use panopticon_core::{MemoryEventSink, OperatorState, RuleBook, StubDecisionSource};
use panopticon_world::create_starting_world;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Path of the canonical configuration file, relative to the working
/// directory.
const CONFIG_PATH: &str = "panopticon-config.yaml";

/// Application entry point for the simulation engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("panopticon-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        max_days = config.bounds.max_days,
        "Configuration loaded"
    );

    // 3. Seed the RNG and create the starting world.
    let mut rng = SmallRng::seed_from_u64(config.world.seed);
    let world = create_starting_world(&config.starting_world_params(), &mut rng)
        .map_err(EngineError::from)?;
    info!(
        agents = world.agents.len(),
        width = world.map.width,
        height = world.map.height,
        "Starting world created"
    );

    // 4. Register the default facility rules.
    let rules = RuleBook::with_default_rules();
    let status = rules.status();
    info!(rules = status.total, "Rule book initialized");

    // 5. Decision source and event sink. The stub declines every slot,
    // so agents run on the goal evaluator.
    let mut decision_source = StubDecisionSource::new();
    let sink = MemoryEventSink::new();

    // 6. Create operator state.
    let operator = Arc::new(OperatorState::new(config.world.tick_interval_ms));

    // 7. Run the simulation loop.
    let mut state = SimulationState {
        world,
        rules,
        config,
        rng,
        tick: 0,
    };
    let mut callback = NoOpCallback;
    let result = runner::run_simulation(
        &mut state,
        &mut decision_source,
        &sink,
        &operator,
        &mut callback,
    )
    .await
    .map_err(EngineError::from)?;

    // 8. Log the result.
    runner::log_simulation_end(&result);
    info!(
        events_recorded = sink.len().unwrap_or(0),
        log_lines = state.world.event_log.len(),
        "Final tallies"
    );

    Ok(())
}

/// Load configuration from `panopticon-config.yaml`, falling back to
/// defaults when the file does not exist.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let path = Path::new(CONFIG_PATH);
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        warn!(path = CONFIG_PATH, "Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}
