//! mousetape - record and replay mouse input with its original timing.
//!
//! The crate is built around a single [`engine::Engine`]: a recording
//! state machine that gates a periodic pointer sampler into an in-memory
//! action log, and a replay scheduler that re-emits the log through a
//! [`driver::PointerDriver`] with the recorded inter-event delays.

pub mod config;
pub mod driver;
pub mod engine;
pub mod replay;
pub mod surface;

pub use config::EngineConfig;
pub use driver::{DriverError, PointerDriver};
pub use engine::log::{Action, ActionKind};
pub use engine::{Engine, EngineEvent};
pub use surface::EngineCommand;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for binaries embedding the engine.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mousetape=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
