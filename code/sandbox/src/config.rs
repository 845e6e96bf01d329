use std::time::Duration;

use clap::Parser;
use engine::{EngineError, WeaponKind};
use thiserror::Error;

const MAX_TICK_HZ: u32 = 1000;

/// Headless driver for the ballistics engine.
#[derive(Debug, Clone, Parser)]
#[command(name = "sandbox", version)]
pub struct Args {
    /// Equipment to operate (rifle, pistol, tank, fighter, artillery).
    #[arg(short, long, default_value = "tank")]
    pub equipment: WeaponKind,

    /// Simulation ticks per second.
    #[arg(long, default_value_t = 60)]
    pub tick_hz: u32,

    /// Stop after this many ticks. Runs until the pilot exits or Ctrl-C otherwise.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Seed for the target and scenery layout.
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Number of engine-managed targets to place.
    #[arg(long, default_value_t = 6)]
    pub targets: usize,

    /// Number of scenery destructibles to place.
    #[arg(long, default_value_t = 4)]
    pub scenery: usize,
}

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("tick rate must be between 1 and 1000 Hz, got {0}")]
    InvalidTickRate(u32),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl Args {
    pub fn validate(&self) -> Result<(), SandboxError> {
        if self.tick_hz == 0 || self.tick_hz > MAX_TICK_HZ {
            return Err(SandboxError::InvalidTickRate(self.tick_hz));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.max(1)))
    }
}
