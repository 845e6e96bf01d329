//! Read-only views handed to the renderer and the HUD.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ids::{ProjectileId, SessionId, TargetId};
use crate::kinematics::ProjectileKind;
use crate::projectile::Projectile;
use crate::session::WeaponSession;
use crate::target::{DestructibleTarget, TargetCategory};
use crate::weapon::{StatBlock, WeaponKind};

/// An explosion still playing out, for rendering only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionVisual {
    pub position: Vec3,
    pub radius: f32,
    pub started_at: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub kind: ProjectileKind,
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub position: Vec3,
    pub radius: f32,
    pub age: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetView {
    pub id: TargetId,
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub category: TargetCategory,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub projectiles: Vec<ProjectileView>,
    pub explosions: Vec<ExplosionView>,
    pub targets: Vec<TargetView>,
}

impl From<&Projectile> for ProjectileView {
    fn from(projectile: &Projectile) -> Self {
        Self {
            id: projectile.id,
            kind: projectile.kind,
            position: projectile.position,
            velocity: projectile.velocity,
        }
    }
}

impl From<&DestructibleTarget> for TargetView {
    fn from(target: &DestructibleTarget) -> Self {
        Self {
            id: target.id,
            position: target.position,
            health: target.health,
            max_health: target.max_health,
            category: target.category,
        }
    }
}

impl ExplosionVisual {
    pub fn view(&self, now: Duration) -> ExplosionView {
        ExplosionView {
            position: self.position,
            radius: self.radius,
            age: now.saturating_sub(self.started_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub session: SessionId,
    pub weapon: WeaponKind,
    pub speed: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    pub yaw: f32,
    pub pitch: f32,
    pub reloading: bool,
    pub stats: StatBlock,
    pub predicted_landing: Vec3,
}

impl From<&WeaponSession> for HudSnapshot {
    fn from(session: &WeaponSession) -> Self {
        let aim = session.aim();
        Self {
            session: session.id,
            weapon: session.kind,
            speed: session.speed(),
            ammo: session.ammo(),
            max_ammo: session.max_ammo(),
            yaw: aim.yaw,
            pitch: aim.pitch,
            reloading: session.is_reloading(),
            stats: session.profile().stats,
            predicted_landing: session.predicted_landing(),
        }
    }
}

/// Rate limiter for HUD snapshots; the HUD does not need one every tick.
#[derive(Debug, Clone)]
pub struct HudThrottle {
    interval: Duration,
    last: Option<Duration>,
}

impl HudThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when at least `interval` has passed since the last accepted call.
    pub fn ready(&mut self, now: Duration) -> bool {
        let due = match self.last {
            Some(last) => now.saturating_sub(last) >= self.interval,
            None => true,
        };
        if due {
            self.last = Some(now);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_lets_one_snapshot_through_per_interval() {
        let mut throttle = HudThrottle::new(Duration::from_millis(100));
        let accepted: Vec<u64> = (0..30u64)
            .map(|tick| tick * 16)
            .filter(|&ms| throttle.ready(Duration::from_millis(ms)))
            .collect();
        assert_eq!(accepted, vec![0, 112, 224, 336, 448]);
    }
}
