//! enigo-backed pointer driver
//!
//! `Enigo` handles both sides of the boundary: `location()` for sampling
//! and `move_mouse`/`button` for injection. The handle is not `Sync`, so
//! it sits behind a mutex shared by the sampler and the replay scheduler;
//! those two never run concurrently (the engine rejects overlapping
//! record/replay), so the lock is uncontended in practice.

use crate::driver::{DriverError, DriverResult, PointerDriver};
use async_trait::async_trait;
use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use parking_lot::Mutex;

pub struct EnigoDriver {
    enigo: Mutex<Enigo>,
}

impl EnigoDriver {
    pub fn new() -> DriverResult<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| DriverError::Init(e.to_string()))?;
        Ok(Self {
            enigo: Mutex::new(enigo),
        })
    }
}

#[async_trait]
impl PointerDriver for EnigoDriver {
    async fn position(&self) -> DriverResult<(i32, i32)> {
        self.enigo
            .lock()
            .location()
            .map_err(|e| DriverError::PositionUnavailable(e.to_string()))
    }

    async fn move_to(&self, x: i32, y: i32) -> DriverResult<()> {
        self.enigo
            .lock()
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| DriverError::InjectionFailed(e.to_string()))
    }

    async fn click(&self) -> DriverResult<()> {
        self.enigo
            .lock()
            .button(Button::Left, Direction::Click)
            .map_err(|e| DriverError::InjectionFailed(e.to_string()))
    }
}
