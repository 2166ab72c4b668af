//! Action log
//!
//! Append-only, time-ordered record of one recording session. Appends only
//! happen while the engine is in the `Recording` phase; the replay
//! scheduler only ever sees a frozen snapshot.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kind of recorded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Move,
    Click,
}

/// One recorded input event.
///
/// `time` is milliseconds since the session epoch; values are
/// non-decreasing in log order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub x: i32,
    pub y: i32,
    pub time: u64,
}

/// Ordered sequence of actions for exactly one session.
#[derive(Debug, Default)]
pub struct ActionLog {
    entries: Vec<Action>,
}

impl ActionLog {
    /// Append an action, clamping its timestamp so the log stays
    /// non-decreasing. All appends come from one clock, so the clamp
    /// should never move a timestamp in practice.
    pub fn append(&mut self, mut action: Action) {
        if let Some(last) = self.entries.last() {
            if action.time < last.time {
                action.time = last.time;
            }
        }
        self.entries.push(action);
    }

    /// Drop all entries. Only called when a fresh session starts.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Frozen read-only copy for the replay scheduler.
    pub fn snapshot(&self) -> Arc<[Action]> {
        self.entries.as_slice().into()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
