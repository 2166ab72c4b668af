//! Replay scheduler
//!
//! Re-emits a frozen action log through the pointer driver. Every action
//! gets its own task sleeping until `replay_start + (time[i] - time[0])`,
//! so delays are measured from session start and drift never accumulates.
//! A watch-channel sequence gate keeps coincident deadlines firing in
//! original log order.

use crate::driver::PointerDriver;
use crate::engine::log::{Action, ActionKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{self, Instant};

/// Run a full replay pass. Returns once the last action has fired.
pub(crate) async fn run(
    driver: Arc<dyn PointerDriver>,
    actions: Arc<[Action]>,
    gap_threshold: Duration,
) {
    debug_assert!(!actions.is_empty());

    let start = Instant::now();
    let base = actions[0].time;
    let (fired_tx, fired_rx) = watch::channel(0usize);
    let fired_tx = Arc::new(fired_tx);
    let mut tasks = JoinSet::new();

    for (index, action) in actions.iter().copied().enumerate() {
        let deadline = start + Duration::from_millis(action.time.saturating_sub(base));
        let gap_to_next = actions
            .get(index + 1)
            .map(|next| Duration::from_millis(next.time.saturating_sub(action.time)));
        let driver = driver.clone();
        let fired_tx = fired_tx.clone();
        let mut fired_rx = fired_rx.clone();

        tasks.spawn(async move {
            time::sleep_until(deadline).await;
            // Sequence gate: wait until every earlier action has fired.
            while *fired_rx.borrow_and_update() < index {
                if fired_rx.changed().await.is_err() {
                    return;
                }
            }

            fire(driver.as_ref(), action).await;

            if let Some(gap) = gap_to_next {
                if is_idle_gap(gap, gap_threshold) {
                    tracing::info!(
                        gap_ms = gap.as_millis() as u64,
                        "idle gap recorded here; waiting it out"
                    );
                }
            }
            let _ = fired_tx.send(index + 1);
        });
    }

    while tasks.join_next().await.is_some() {}
}

/// A recorded gap strictly longer than the threshold gets a diagnostic;
/// a gap of exactly the threshold stays silent.
fn is_idle_gap(gap: Duration, threshold: Duration) -> bool {
    gap > threshold
}

/// Inject one action. A failed injection is logged and skipped; the rest
/// of the replay continues.
async fn fire(driver: &dyn PointerDriver, action: Action) {
    let result = match action.kind {
        ActionKind::Move => driver.move_to(action.x, action.y).await,
        ActionKind::Click => match driver.move_to(action.x, action.y).await {
            Ok(()) => driver.click().await,
            Err(e) => Err(e),
        },
    };
    if let Err(e) = result {
        tracing::warn!(kind = ?action.kind, x = action.x, y = action.y, "replay action skipped: {e}");
    }
}
