use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reference cadence the per-kind gravity constants are tuned against.
pub const REFERENCE_HZ: f32 = 60.0;
pub const REFERENCE_FRAME: f32 = 1.0 / REFERENCE_HZ;

/// Longest step the integrator will take in one tick, in seconds.
pub const MAX_STEP_SECS: f32 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound applied to the integration step on frame hitches.
    pub max_step: Duration,
    /// How long a target at 0 health stays in the registry (destruction effects).
    pub destroy_delay: Duration,
    /// How long an explosion stays visible in render snapshots.
    pub explosion_lifetime: Duration,
    /// Minimum spacing between two HUD snapshots.
    pub hud_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_step: Duration::from_secs_f32(MAX_STEP_SECS),
            destroy_delay: Duration::from_millis(1500),
            explosion_lifetime: Duration::from_millis(1000),
            hud_interval: Duration::from_millis(100),
        }
    }
}
