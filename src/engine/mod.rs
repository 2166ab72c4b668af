//! Recording engine
//!
//! [`Engine`] owns the recording state machine and the action log, and is
//! the single entry point for every command the surface can issue:
//! `start`, `stop`, `pause`, `resume`, `click`, `replay`. Commands that
//! are invalid for the current state are silent no-ops; the caller is
//! never expected to know the state machine.

pub mod log;
pub(crate) mod sampler;
pub mod state;

use crate::config::EngineConfig;
use crate::driver::PointerDriver;
use crate::replay;
use self::log::{Action, ActionLog};
use self::state::{EngineStatus, RecordingPhase};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::Instant;
use uuid::Uuid;

/// Notifications emitted to the command surface, for UI state sync only.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    RecordingStarted { session_id: Uuid },
    RecordingStopped { actions: Vec<Action> },
    RecordingPaused,
    RecordingResumed,
    ReplayStarted,
    ReplayFinished,
}

pub(crate) struct SessionState {
    pub(crate) phase: RecordingPhase,
    pub(crate) replaying: bool,
    pub(crate) epoch: Instant,
    pub(crate) session_id: Uuid,
    pub(crate) log: ActionLog,
}

pub(crate) struct Shared {
    pub(crate) config: EngineConfig,
    pub(crate) driver: Arc<dyn PointerDriver>,
    pub(crate) state: Mutex<SessionState>,
    pub(crate) events: broadcast::Sender<EngineEvent>,
}

/// The capture/replay engine. Cheap to share behind an `Arc`; all methods
/// take `&self` and must run inside a tokio runtime.
pub struct Engine {
    shared: Arc<Shared>,
}

impl Engine {
    pub fn new(driver: Arc<dyn PointerDriver>, config: EngineConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                config,
                driver,
                state: Mutex::new(SessionState {
                    phase: RecordingPhase::Idle,
                    replaying: false,
                    epoch: Instant::now(),
                    session_id: Uuid::new_v4(),
                    log: ActionLog::default(),
                }),
                events,
            }),
        }
    }

    /// Subscribe to engine notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.shared.events.subscribe()
    }

    pub fn status(&self) -> EngineStatus {
        let s = self.shared.state.lock();
        EngineStatus {
            phase: s.phase,
            replaying: s.replaying,
            logged_actions: s.log.len(),
        }
    }

    /// Begin a recording session, or resume a paused one.
    ///
    /// The log is cleared only when a fresh session starts from `Idle`;
    /// a re-entrant `start` while already recording is a no-op so an
    /// in-progress session cannot be reset by accident. Rejected while a
    /// replay is in flight, since recording and replay both contend for
    /// the physical pointer.
    pub async fn start(&self) -> bool {
        let fresh_session = {
            let mut s = self.shared.state.lock();
            if s.replaying {
                tracing::warn!("start rejected: replay in progress");
                return false;
            }
            match s.phase {
                RecordingPhase::Recording => {
                    tracing::debug!("start ignored: already recording");
                    return false;
                }
                RecordingPhase::Paused => {
                    s.phase = RecordingPhase::Recording;
                    None
                }
                RecordingPhase::Idle => {
                    s.log.clear();
                    s.epoch = Instant::now();
                    s.session_id = Uuid::new_v4();
                    s.phase = RecordingPhase::Recording;
                    Some((s.session_id, s.epoch))
                }
            }
        };

        match fresh_session {
            Some((session_id, epoch)) => {
                tracing::info!(%session_id, "recording started");
                tokio::spawn(sampler::run(self.shared.clone(), session_id, epoch));
                self.emit(EngineEvent::RecordingStarted { session_id });
            }
            None => {
                tracing::info!("recording resumed via start");
                self.emit(EngineEvent::RecordingResumed);
            }
        }
        true
    }

    /// End the session and hand back the finalized log. The log stays
    /// retained for `replay` until the next fresh `start`.
    pub async fn stop(&self) -> Option<Vec<Action>> {
        let actions = {
            let mut s = self.shared.state.lock();
            if s.phase == RecordingPhase::Idle {
                tracing::debug!("stop ignored: not recording");
                return None;
            }
            s.phase = RecordingPhase::Idle;
            s.log.as_slice().to_vec()
        };
        tracing::info!(actions = actions.len(), "recording stopped");
        self.emit(EngineEvent::RecordingStopped {
            actions: actions.clone(),
        });
        Some(actions)
    }

    /// Suspend sampling. Future ticks are suppressed; a tick already past
    /// its gating check still lands fully.
    pub async fn pause(&self) {
        {
            let mut s = self.shared.state.lock();
            if s.phase != RecordingPhase::Recording {
                tracing::debug!("pause ignored: not recording");
                return;
            }
            s.phase = RecordingPhase::Paused;
        }
        tracing::info!("recording paused");
        self.emit(EngineEvent::RecordingPaused);
    }

    /// Resume a paused session. Rejected while a replay is in flight:
    /// replay is legal from `Paused`, and resuming mid-replay would put
    /// the sampler and the injector on the pointer at the same time.
    pub async fn resume(&self) {
        {
            let mut s = self.shared.state.lock();
            if s.phase != RecordingPhase::Paused {
                tracing::debug!("resume ignored: not paused");
                return;
            }
            if s.replaying {
                tracing::warn!("resume rejected: replay in progress");
                return;
            }
            s.phase = RecordingPhase::Recording;
        }
        tracing::info!("recording resumed");
        self.emit(EngineEvent::RecordingResumed);
    }

    /// Record one click at the position sampled now. A signal arriving
    /// while sampling is gated off produces nothing and is never queued.
    pub async fn click(&self) {
        let session_id = {
            let s = self.shared.state.lock();
            if s.phase != RecordingPhase::Recording {
                tracing::debug!("click ignored: not recording");
                return;
            }
            s.session_id
        };
        sampler::sample_once(&self.shared, log::ActionKind::Click, session_id).await;
    }

    /// Replay the retained log through the pointer driver, preserving the
    /// recorded inter-event delays. Rejected while recording; an empty
    /// log completes immediately. Returns as soon as the replay is
    /// scheduled; completion is signalled by [`EngineEvent::ReplayFinished`].
    pub async fn replay(&self) -> bool {
        let snapshot = {
            let mut s = self.shared.state.lock();
            if s.phase == RecordingPhase::Recording {
                tracing::warn!("replay rejected: recording in progress");
                return false;
            }
            if s.replaying {
                tracing::debug!("replay ignored: already replaying");
                return false;
            }
            if s.log.is_empty() {
                tracing::debug!("replay of empty log: nothing to do");
                return true;
            }
            s.replaying = true;
            s.log.snapshot()
        };

        tracing::info!(actions = snapshot.len(), "replay started");
        self.emit(EngineEvent::ReplayStarted);

        let shared = self.shared.clone();
        tokio::spawn(async move {
            replay::run(
                shared.driver.clone(),
                snapshot,
                shared.config.gap_threshold(),
            )
            .await;
            shared.state.lock().replaying = false;
            tracing::info!("replay finished");
            let _ = shared.events.send(EngineEvent::ReplayFinished);
        });
        true
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.shared.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::log::ActionKind;
    use crate::driver::{DriverResult, PointerDriver};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
    use std::time::Duration;
    use tokio::time;

    /// Pointer whose position advances on every read, so each sampled
    /// action carries a distinguishable coordinate.
    #[derive(Default)]
    struct CountingPointer {
        reads: AtomicI32,
        fail_reads: AtomicBool,
        moves: Mutex<Vec<(i32, i32)>>,
        clicks: AtomicI32,
    }

    #[async_trait]
    impl PointerDriver for CountingPointer {
        async fn position(&self) -> DriverResult<(i32, i32)> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(crate::driver::DriverError::PositionUnavailable(
                    "scripted failure".into(),
                ));
            }
            let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
            Ok((n, n * 10))
        }

        async fn move_to(&self, x: i32, y: i32) -> DriverResult<()> {
            self.moves.lock().push((x, y));
            Ok(())
        }

        async fn click(&self) -> DriverResult<()> {
            self.clicks.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn engine_with_pointer() -> (Engine, Arc<CountingPointer>) {
        let pointer = Arc::new(CountingPointer::default());
        let engine = Engine::new(pointer.clone(), EngineConfig::default());
        (engine, pointer)
    }

    async fn wait_for_replay_finished(rx: &mut broadcast::Receiver<EngineEvent>) {
        loop {
            match rx.recv().await {
                Ok(EngineEvent::ReplayFinished) => return,
                Ok(_) => continue,
                Err(e) => panic!("event channel closed before replay finished: {e}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_sampling_follows_cadence() {
        let (engine, _) = engine_with_pointer();
        engine.start().await;
        time::sleep(Duration::from_millis(250)).await;
        let actions = engine.stop().await.unwrap();

        let times: Vec<u64> = actions.iter().map(|a| a.time).collect();
        assert_eq!(times, vec![100, 200]);
        assert!(actions.iter().all(|a| a.kind == ActionKind::Move));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_while_recording_keeps_log() {
        let (engine, _) = engine_with_pointer();
        assert!(engine.start().await);
        time::sleep(Duration::from_millis(250)).await;
        assert!(!engine.start().await);
        let actions = engine.stop().await.unwrap();
        assert_eq!(actions.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_start_clears_previous_session() {
        let (engine, _) = engine_with_pointer();
        engine.start().await;
        time::sleep(Duration::from_millis(150)).await;
        assert_eq!(engine.stop().await.unwrap().len(), 1);

        engine.start().await;
        time::sleep(Duration::from_millis(150)).await;
        let actions = engine.stop().await.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].time, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn no_samples_while_paused() {
        let (engine, _) = engine_with_pointer();
        engine.start().await;
        time::sleep(Duration::from_millis(250)).await;
        engine.pause().await;
        time::sleep(Duration::from_millis(1000)).await;
        engine.click().await; // gated off, must not queue
        engine.resume().await;
        let actions = engine.stop().await.unwrap();

        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| a.kind == ActionKind::Move));
    }

    #[tokio::test(start_paused = true)]
    async fn click_samples_once_per_signal() {
        let (engine, _) = engine_with_pointer();
        engine.start().await;
        engine.click().await;
        engine.click().await;
        engine.click().await;
        let actions = engine.stop().await.unwrap();

        let clicks: Vec<&Action> = actions
            .iter()
            .filter(|a| a.kind == ActionKind::Click)
            .collect();
        assert_eq!(clicks.len(), 3);
        // Each click sampled the pointer at its own signal time.
        let positions: Vec<(i32, i32)> = clicks.iter().map(|a| (a.x, a.y)).collect();
        assert_eq!(positions, vec![(1, 10), (2, 20), (3, 30)]);
    }

    #[tokio::test(start_paused = true)]
    async fn timestamps_are_monotonic() {
        let (engine, _) = engine_with_pointer();
        engine.start().await;
        for _ in 0..5 {
            time::sleep(Duration::from_millis(70)).await;
            engine.click().await;
        }
        let actions = engine.stop().await.unwrap();
        assert!(actions.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_position_read_skips_tick_but_keeps_session() {
        let (engine, pointer) = engine_with_pointer();
        engine.start().await;
        // Toggle the fault window between tick deadlines, never on one,
        // so which task wakes first at a deadline cannot change the
        // outcome: the 100ms tick always fails, the 200ms tick succeeds.
        time::sleep(Duration::from_millis(50)).await;
        pointer.fail_reads.store(true, Ordering::SeqCst);
        time::sleep(Duration::from_millis(100)).await;
        pointer.fail_reads.store(false, Ordering::SeqCst);
        time::sleep(Duration::from_millis(100)).await;
        let actions = engine.stop().await.unwrap();

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].time, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_rejected_while_recording() {
        let (engine, pointer) = engine_with_pointer();
        engine.start().await;
        assert!(!engine.replay().await);
        engine.stop().await;
        assert!(pointer.moves.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn start_rejected_while_replaying() {
        let (engine, _) = engine_with_pointer();
        let mut events = engine.subscribe();

        engine.start().await;
        engine.click().await;
        time::sleep(Duration::from_millis(500)).await;
        engine.click().await;
        engine.stop().await;

        assert!(engine.replay().await);
        assert!(engine.status().replaying);
        assert!(!engine.start().await);

        wait_for_replay_finished(&mut events).await;
        assert!(!engine.status().replaying);
        assert!(engine.start().await);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_rejected_while_replaying() {
        let (engine, _) = engine_with_pointer();
        let mut events = engine.subscribe();

        engine.start().await;
        engine.click().await;
        time::sleep(Duration::from_millis(250)).await;
        engine.click().await;
        engine.pause().await;

        // Replay from Paused is legal, but the paused session must not
        // come back to life while the injector owns the pointer.
        assert!(engine.replay().await);
        engine.resume().await;
        let status = engine.status();
        assert_eq!(status.phase, RecordingPhase::Paused);
        assert!(status.replaying);

        wait_for_replay_finished(&mut events).await;
        engine.resume().await;
        assert_eq!(engine.status().phase, RecordingPhase::Recording);

        // No samples leaked into the log while the replay ran.
        let actions = engine.stop().await.unwrap();
        assert_eq!(actions.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_of_empty_log_is_a_noop() {
        let (engine, pointer) = engine_with_pointer();
        assert!(engine.replay().await);
        assert!(!engine.status().replaying);
        assert!(pointer.moves.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn replay_emits_recorded_sequence() {
        let (engine, pointer) = engine_with_pointer();
        let mut events = engine.subscribe();

        engine.start().await;
        engine.click().await;
        engine.pause().await;
        time::sleep(Duration::from_millis(200)).await;
        engine.resume().await;
        engine.click().await;
        engine.stop().await;

        assert!(engine.replay().await);
        wait_for_replay_finished(&mut events).await;

        // A replayed click first moves the pointer to the recorded spot.
        assert_eq!(pointer.moves.lock().len(), 2);
        assert_eq!(pointer.clicks.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_notification_carries_final_log() {
        let (engine, _) = engine_with_pointer();
        let mut events = engine.subscribe();

        engine.start().await;
        engine.click().await;
        engine.stop().await;

        let mut stopped_actions = None;
        while let Ok(event) = events.try_recv() {
            if let EngineEvent::RecordingStopped { actions } = event {
                stopped_actions = Some(actions);
            }
        }
        let actions = stopped_actions.expect("RecordingStopped not emitted");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::Click);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_idle_is_a_noop() {
        let (engine, _) = engine_with_pointer();
        assert!(engine.stop().await.is_none());
        engine.resume().await; // also a no-op from idle
        assert_eq!(engine.status().phase, RecordingPhase::Idle);
    }
}
