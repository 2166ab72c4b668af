//! Pointer driver boundary
//!
//! The engine talks to the OS pointer exclusively through [`PointerDriver`]:
//! the sampler reads the cursor position during recording, the replay
//! scheduler moves the cursor and synthesizes clicks. Keeping this behind a
//! trait lets tests run against a scripted pointer instead of real hardware.

pub mod enigo;

pub use self::enigo::EnigoDriver;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the OS input layer.
///
/// None of these are fatal to a session: the engine skips the affected
/// tick or replay action and keeps going.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("driver initialization failed: {0}")]
    Init(String),

    #[error("pointer position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("input injection failed: {0}")]
    InjectionFailed(String),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Access to the OS pointer.
#[async_trait]
pub trait PointerDriver: Send + Sync {
    /// Current cursor position in screen coordinates.
    async fn position(&self) -> DriverResult<(i32, i32)>;

    /// Move the cursor to absolute screen coordinates.
    async fn move_to(&self, x: i32, y: i32) -> DriverResult<()>;

    /// Synthesize a left-button click at the current cursor position.
    async fn click(&self) -> DriverResult<()>;
}
