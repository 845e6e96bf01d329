//! A scripted pilot standing in for a human at the keyboard.

use std::time::Duration;

use glam::Vec2;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::debug;

use crate::controls::{ControlMode, KeyCode, RawInput};

const VOLLEYS: usize = 3;

/// One scripted input, sent `wait` after the previous one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub wait: Duration,
    pub input: RawInput,
}

fn step(wait_ms: u64, input: RawInput) -> Step {
    Step {
        wait: Duration::from_millis(wait_ms),
        input,
    }
}

/// Aim, drive, fire a few volleys, reload, fire again, then leave the equipment.
///
/// Gaps between volleys follow the weapon's fire interval so every volley is
/// accepted.
pub fn pilot_script(mode: ControlMode, viewport: Vec2) -> Vec<Step> {
    let profile = mode.weapon().profile();
    let volley_gap = profile.fire_interval.as_millis() as u64 + 200;
    let reload_wait = profile.reload_duration.as_millis() as u64 + 500;
    let hold = if profile.automatic { 500 } else { 30 };

    let (trigger_down, trigger_up) = match mode {
        ControlMode::Fighter => (
            RawInput::KeyDown(KeyCode::Space),
            RawInput::KeyUp(KeyCode::Space),
        ),
        _ => (RawInput::MouseDown, RawInput::MouseUp),
    };

    let mut steps = Vec::new();
    match mode {
        ControlMode::Fighter => {
            steps.push(step(80, RawInput::KeyDown(KeyCode::Down)));
            steps.push(step(20, RawInput::KeyUp(KeyCode::Down)));
        }
        _ => {
            // A little above center, slightly right.
            let aim = Vec2::new(viewport.x * 0.55, viewport.y * 0.35);
            steps.push(step(80, RawInput::PointerMoved { x: aim.x, y: aim.y }));
        }
    }

    steps.push(step(500, RawInput::KeyDown(KeyCode::W)));
    steps.push(step(1000, RawInput::KeyUp(KeyCode::W)));

    for _ in 0..VOLLEYS {
        steps.push(step(volley_gap, trigger_down));
        steps.push(step(hold, trigger_up));
        if mode != ControlMode::Fighter {
            steps.push(step(150, RawInput::PointerDelta { dx: 15.0, dy: 0.0 }));
        }
    }

    steps.push(step(1500, RawInput::KeyDown(KeyCode::R)));
    steps.push(step(20, RawInput::KeyUp(KeyCode::R)));

    steps.push(step(reload_wait, trigger_down));
    steps.push(step(hold, trigger_up));

    steps.push(step(2000, RawInput::KeyDown(KeyCode::Escape)));
    steps.push(step(20, RawInput::KeyUp(KeyCode::Escape)));
    steps
}

/// Plays `steps` into `inputs` in real time. Stops early if the receiving side
/// goes away.
pub async fn run_pilot(steps: Vec<Step>, inputs: mpsc::Sender<RawInput>) {
    for Step { wait, input } in steps {
        sleep(wait).await;
        if inputs.send(input).await.is_err() {
            debug!("Input channel closed, pilot stopping");
            return;
        }
    }
    debug!("Pilot script finished");
}
