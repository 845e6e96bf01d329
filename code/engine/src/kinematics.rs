//! Per-tick projectile motion.
//!
//! Velocities are expressed in world units per reference frame (1/60 s) and the
//! per-kind gravity constants are tuned against that frame, so a step of `dt`
//! seconds advances the state by `dt * REFERENCE_HZ` frames.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::config::REFERENCE_HZ;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
pub enum ProjectileKind {
    HitscanBullet,
    BallisticShell,
    PoweredMissile,
    ArtilleryShell,
}

/// Motion and lifetime constants shared by every projectile of one kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticProfile {
    pub gravity: f32,
    /// Horizontal velocity factor applied once per tick.
    pub drag: f32,
    /// Below this height the projectile has hit the ground.
    pub ground_level: f32,
    pub max_lifetime: Duration,
    /// Projectiles past this |x| or |z| are retired.
    pub world_bound: Option<f32>,
    /// Whether running out of lifetime (or world) ends in an explosion.
    pub detonates_on_expiry: bool,
}

const BULLET: BallisticProfile = BallisticProfile {
    gravity: 0.008,
    drag: 0.997,
    ground_level: 0.5,
    max_lifetime: Duration::from_secs(10),
    world_bound: None,
    detonates_on_expiry: false,
};

const SHELL: BallisticProfile = BallisticProfile {
    gravity: 0.015,
    drag: 0.998,
    ground_level: 0.5,
    max_lifetime: Duration::from_secs(5),
    world_bound: None,
    detonates_on_expiry: true,
};

const MISSILE: BallisticProfile = BallisticProfile {
    gravity: 0.005,
    drag: 1.0,
    ground_level: 1.0,
    max_lifetime: Duration::from_secs(8),
    world_bound: Some(300.0),
    detonates_on_expiry: true,
};

const ARTILLERY: BallisticProfile = BallisticProfile {
    gravity: 0.04,
    drag: 0.995,
    ground_level: 0.5,
    max_lifetime: Duration::from_secs(15),
    world_bound: None,
    detonates_on_expiry: true,
};

impl ProjectileKind {
    pub fn ballistics(self) -> &'static BallisticProfile {
        match self {
            ProjectileKind::HitscanBullet => &BULLET,
            ProjectileKind::BallisticShell => &SHELL,
            ProjectileKind::PoweredMissile => &MISSILE,
            ProjectileKind::ArtilleryShell => &ARTILLERY,
        }
    }
}

/// Clamps a frame delta so a hitch cannot make a projectile tunnel through targets.
pub fn clamp_step(delta: Duration, max_step: Duration) -> Duration {
    delta.min(max_step)
}

/// Advances one projectile by `dt` seconds using semi-implicit Euler.
///
/// 1. position += velocity * dt
/// 2. velocity.y -= gravity * dt
/// 3. velocity.x and velocity.z are multiplied by the drag factor; the vertical
///    axis never decays.
///
/// `dt` must already be clamped; callers reject non-finite state beforehand.
pub fn integrate(
    position: Vec3,
    velocity: Vec3,
    profile: &BallisticProfile,
    dt: f32,
) -> (Vec3, Vec3) {
    // Constants are per reference frame; scale them to the step.
    let frames = dt * REFERENCE_HZ;

    // 1. Move with the velocity from the start of the step.
    let next_position = position + velocity * frames;

    // 2. Gravity.
    let mut next_velocity = velocity;
    next_velocity.y -= profile.gravity * frames;
    // 3. Horizontal drag only.
    next_velocity.x *= profile.drag;
    next_velocity.z *= profile.drag;

    (next_position, next_velocity)
}

pub fn is_finite_state(position: Vec3, velocity: Vec3) -> bool {
    position.is_finite() && velocity.is_finite()
}
