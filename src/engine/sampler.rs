//! Input sampler
//!
//! One cooperative task per recording session polls the pointer at the
//! configured cadence; click signals reuse the same single-sample path.
//! Both are gated on the `Recording` phase, re-checked under the state
//! lock after the driver read so a concurrent `stop` means a tick either
//! lands fully or not at all.

use super::log::{Action, ActionKind};
use super::state::RecordingPhase;
use super::Shared;
use std::sync::Arc;
use tokio::time::{self, Instant, MissedTickBehavior};
use uuid::Uuid;

/// Periodic move-sampling loop for one session. Exits when the session
/// ends or a newer session takes over.
pub(crate) async fn run(shared: Arc<Shared>, session_id: Uuid, epoch: Instant) {
    let period = shared.config.sample_interval();
    let mut ticker = time::interval_at(epoch + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let phase = {
            let s = shared.state.lock();
            if s.session_id != session_id {
                break;
            }
            s.phase
        };
        match phase {
            RecordingPhase::Idle => break,
            RecordingPhase::Paused => continue,
            RecordingPhase::Recording => {
                sample_once(&shared, ActionKind::Move, session_id).await;
            }
        }
    }
    tracing::debug!(%session_id, "sampler task exited");
}

/// Read the pointer once and append an action, provided the session is
/// still recording once the position is in hand. A failed read skips
/// this sample and leaves the session running.
pub(crate) async fn sample_once(shared: &Arc<Shared>, kind: ActionKind, session_id: Uuid) {
    match shared.driver.position().await {
        Ok((x, y)) => {
            let mut s = shared.state.lock();
            if s.session_id != session_id || s.phase != RecordingPhase::Recording {
                return;
            }
            let time = s.epoch.elapsed().as_millis() as u64;
            s.log.append(Action { kind, x, y, time });
        }
        Err(e) => {
            tracing::warn!(?kind, "pointer sample skipped: {e}");
        }
    }
}
