mod app;
mod config;
mod controls;
mod layout;
mod scenery;
mod script;

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{SandboxApp, TickStatus, VIEWPORT};
use config::Args;

const INPUT_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    args.validate()?;

    let mut app = SandboxApp::new(&args)?;
    let (input_tx, mut input_rx) = mpsc::channel(INPUT_BUFFER);
    let pilot = tokio::spawn(script::run_pilot(
        script::pilot_script(app.control_mode(), VIEWPORT),
        input_tx,
    ));

    let mut ticker = time::interval(args.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
            Some(input) = input_rx.recv() => app.handle_input(input),
            _ = ticker.tick() => {
                let now = Instant::now();
                let delta = now.duration_since(last_tick);
                last_tick = now;

                if app.tick(delta) == TickStatus::Finished {
                    break;
                }
                if args.ticks.is_some_and(|limit| app.stats().ticks >= limit) {
                    info!(limit = ?args.ticks, "Tick limit reached");
                    break;
                }
            }
        }
    }

    pilot.abort();
    let stats = app.stats();
    info!(
        ticks = stats.ticks,
        shots = stats.shots,
        hits = stats.hits,
        destroyed = stats.destroyed,
        reloads = stats.reloads,
        targets_left = app.simulation().targets().len(),
        scenery_standing = app.scenery().standing(),
        "Run finished"
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
