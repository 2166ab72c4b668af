//! Interactive shell for the mousetape engine.
//!
//! Stands in for the graphical/hotkey surface: reads commands from stdin,
//! forwards them to the engine, and prints the recorded log as JSON when
//! a session stops.

use anyhow::Result;
use mousetape::driver::EnigoDriver;
use mousetape::{surface, Engine, EngineCommand, EngineConfig, EngineEvent};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    mousetape::init_tracing();
    tracing::info!("starting mousetape v{}", env!("CARGO_PKG_VERSION"));

    let driver = Arc::new(EnigoDriver::new()?);
    let engine = Arc::new(Engine::new(driver, EngineConfig::default()));

    let mut events = engine.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                EngineEvent::RecordingStopped { actions } => {
                    match serde_json::to_string_pretty(&actions) {
                        Ok(json) => println!("{json}"),
                        Err(e) => tracing::error!("failed to serialize log: {e}"),
                    }
                }
                other => tracing::info!(?other, "engine event"),
            }
        }
    });

    let commands = surface::spawn(engine.clone());

    println!("commands: start | stop | pause | resume | click | replay | state | quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.trim() {
            "start" => EngineCommand::Start,
            "stop" => EngineCommand::Stop,
            "pause" => EngineCommand::Pause,
            "resume" => EngineCommand::Resume,
            "click" => EngineCommand::Click,
            "replay" => EngineCommand::Replay,
            "state" => {
                println!("{}", serde_json::to_string(&engine.status())?);
                continue;
            }
            "quit" | "exit" => break,
            "" => continue,
            other => {
                eprintln!("unknown command: {other}");
                continue;
            }
        };
        commands.send(command).await?;
    }

    Ok(())
}
