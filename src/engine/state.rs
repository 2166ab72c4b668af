//! Recording session state

use serde::{Deserialize, Serialize};

/// Phase of the recording state machine.
///
/// `Recording` and `Paused` are mutually exclusive by construction;
/// sampling is permitted iff the phase is `Recording`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingPhase {
    Idle,
    Recording,
    Paused,
}

/// Point-in-time view of the engine state, for UI sync.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub phase: RecordingPhase,
    pub replaying: bool,
    pub logged_actions: usize,
}
