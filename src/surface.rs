//! Command surface adapter
//!
//! Bridges an external shell (GUI, hotkey listener, CLI) to the engine:
//! commands arrive fire-and-forget over an mpsc channel, notifications
//! flow back through [`Engine::subscribe`]. Commands invalid for the
//! current state are engine-level no-ops, so shells need no state-machine
//! knowledge.

use crate::engine::Engine;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Commands a shell can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Start,
    Stop,
    Pause,
    Resume,
    Click,
    Replay,
}

/// Spawn the command-dispatch task and hand back its sender. The task
/// exits when every sender is dropped.
pub fn spawn(engine: Arc<Engine>) -> mpsc::Sender<EngineCommand> {
    let (tx, mut rx) = mpsc::channel::<EngineCommand>(32);
    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            tracing::debug!(?command, "dispatching command");
            match command {
                EngineCommand::Start => {
                    engine.start().await;
                }
                EngineCommand::Stop => {
                    engine.stop().await;
                }
                EngineCommand::Pause => engine.pause().await,
                EngineCommand::Resume => engine.resume().await,
                EngineCommand::Click => engine.click().await,
                EngineCommand::Replay => {
                    engine.replay().await;
                }
            }
        }
        tracing::debug!("command surface closed");
    });
    tx
}
