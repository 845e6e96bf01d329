use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ids::{ProjectileId, SessionId};
use crate::kinematics::{BallisticProfile, ProjectileKind};
use crate::weapon::WeaponKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub kind: ProjectileKind,
    /// Weapon that fired it; damage, blast radius and policies come from its profile.
    pub weapon: WeaponKind,
    pub owner: SessionId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub spawned_at: Duration,
    pub ttl: Duration,
}

impl Projectile {
    pub fn ballistics(&self) -> &'static BallisticProfile {
        self.kind.ballistics()
    }

    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.spawned_at)
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        self.age(now) > self.ttl
    }

    pub fn is_out_of_bounds(&self) -> bool {
        match self.ballistics().world_bound {
            Some(bound) => self.position.x.abs() > bound || self.position.z.abs() > bound,
            None => false,
        }
    }
}
