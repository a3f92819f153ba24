//! Demo host for the mechanics runtime.
//!
//! Starts the scheduler over a small arena, drives it from a naive AI and from
//! JSON requests on stdin, and prints every published event to stdout as one
//! JSON object per line.
mod config;
mod demo;
mod input;
mod logging;

use anyhow::{Context, Result};
use mechanics_runtime::{Event, Runtime, RuntimeHandle, Topic};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ServerConfig;

const TOPICS: [Topic; 4] = [
    Topic::Combat,
    Topic::Awareness,
    Topic::Creature,
    Topic::Scheduler,
];

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _log_guard = logging::setup_logging(config.log_dir.as_deref())?;

    info!(
        target: "server",
        restore_interval = ?config.runtime.mechanics.credit_restore_interval,
        attack_exhaustion = ?config.runtime.mechanics.attack_exhaustion,
        ai_tick = ?config.ai_tick,
        "starting mechanics server"
    );

    let world = demo::demo_world(&config.runtime.mechanics).context("failed to build demo world")?;
    let runtime = Runtime::builder()
        .config(config.runtime.clone())
        .world(world)
        .build()
        .await
        .context("failed to start runtime")?;
    let handle = runtime.handle();

    let mut tasks = print_events(&handle);
    demo::introduce(&handle)
        .await
        .context("failed to introduce demo creatures")?;
    tasks.push(tokio::spawn(demo::run_ai(handle.clone(), config.ai_tick)));
    tasks.push(tokio::spawn(input::run_stdin(handle.clone())));

    match config.run_for {
        Some(limit) => {
            tokio::select! {
                _ = tokio::time::sleep(limit) => info!(target: "server", ?limit, "run limit reached"),
                _ = tokio::signal::ctrl_c() => info!(target: "server", "interrupted"),
            }
        }
        None => {
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for ctrl-c")?;
            info!(target: "server", "interrupted");
        }
    }

    runtime.shutdown().await.context("runtime shutdown failed")?;
    for task in tasks {
        task.abort();
    }

    info!(target: "server", "stopped");
    Ok(())
}

/// One printer per topic, each writing events as JSON lines.
fn print_events(handle: &RuntimeHandle) -> Vec<JoinHandle<()>> {
    handle
        .subscribe_multiple(&TOPICS)
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => print_event(&event),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(target: "server", ?topic, skipped, "event printer lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

fn print_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(line) => println!("{line}"),
        Err(error) => warn!(target: "server", %error, "failed to encode event"),
    }
}
