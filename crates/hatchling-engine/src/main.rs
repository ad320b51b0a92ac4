//! Terminal host for the Hatchling virtual pet.
//!
//! Loads configuration, restores the pet from its save slot, catches it up
//! to the present, then runs the heartbeat while reading owner commands
//! from stdin.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `hatchling.yaml` (or `$HATCHLING_CONFIG`)
//! 2. Initialize structured logging (tracing) on stderr
//! 3. Open the JSON save directory
//! 4. Open the session: load, catch up, save
//! 5. Start the console and run the scheduler until `quit` or end of input

mod console;
mod error;
mod render;

use hatchling_core::{HatchlingConfig, Scheduler, Session, SnapshotObserver, SystemClock};
use hatchling_store::JsonFileStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::render::ConsoleRenderer;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step fails or the scheduler stops on a
/// save failure.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = HatchlingConfig::path_from_env();
    let config = HatchlingConfig::load_or_default(&config_path)?;

    // 2. Initialize structured logging. stdout belongs to the console.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_unset| EnvFilter::new(&config.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(
        config_path = %config_path.display(),
        tick_interval_ms = config.schedule.tick_interval_ms,
        state_dir = %config.storage.dir.display(),
        slot_key = config.storage.slot_key,
        "hatchling starting"
    );

    // 3. Open the save directory.
    let store = JsonFileStore::open(&config.storage.dir)?;

    // 4. Restore and catch up.
    let (session, opened) = Session::open(&config, Box::new(store), Box::new(SystemClock))?;
    let mut renderer = ConsoleRenderer::new(std::io::stdout());
    renderer.on_catch_up(&opened.catch_up, &session.snapshot());
    println!("{}", console::USAGE);

    // 5. Run.
    let (scheduler, handle) = Scheduler::new(session, Box::new(renderer))?;
    let console_task = tokio::spawn(console::run(
        handle,
        console::spawn_stdin_reader(),
        std::io::stdout(),
    ));

    let result = scheduler.run().await;
    if result.is_err() {
        console_task.abort();
    }
    match console_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Console stopped on an I/O error"),
        Err(e) if e.is_cancelled() => {}
        Err(e) => warn!(error = %e, "Console task failed"),
    }

    let (summary, session) = result?;
    session.save()?;
    info!(
        heartbeat_ticks = summary.heartbeat_ticks,
        commands = summary.commands,
        stage = %session.pet_state().life_stage(),
        "hatchling stopped"
    );
    Ok(())
}
