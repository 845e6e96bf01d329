use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ids::TargetId;
use crate::projectile::Projectile;
use crate::target::{DestructibleTarget, TargetRegistry};

/// How a projectile is tested against a target's collision radius.
///
/// The two variants are separate rules, not one test with a knob.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitTest {
    /// Euclidean distance to the reference point is strictly below the radius.
    Sphere,
    /// Every axis offset is strictly below `radius + tolerance`.
    Box { tolerance: f32 },
}

impl HitTest {
    pub fn hits(self, point: Vec3, target: &DestructibleTarget) -> bool {
        let radius = target.category.collision_radius();
        let offset = point - target.reference_point();
        match self {
            HitTest::Sphere => offset.length() < radius,
            HitTest::Box { tolerance } => {
                let reach = radius + tolerance;
                offset.abs().max_element() < reach
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryReason {
    Timeout,
    OutOfBounds,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionOutcome {
    NoHit,
    GroundImpact(Vec3),
    /// `impact` is the target's reference point, not the projectile position.
    TargetHit { target: TargetId, impact: Vec3 },
    Expired {
        point: Vec3,
        reason: ExpiryReason,
        detonates: bool,
    },
}

impl CollisionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CollisionOutcome::NoHit)
    }
}

/// Tests a projectile's post-integration position against the ground plane,
/// the live targets and its lifetime budget, in that order.
///
/// Targets are visited in registry order and the first one inside its
/// collision radius is taken, even if a later one is closer.
pub fn detect(
    projectile: &Projectile,
    now: Duration,
    targets: &TargetRegistry,
    hit_test: HitTest,
) -> CollisionOutcome {
    let ballistics = projectile.ballistics();
    let position = projectile.position;

    // 1. Ground. The impact is pinned to the plane so blasts never start underground.
    if position.y < ballistics.ground_level {
        let mut impact = position;
        impact.y = ballistics.ground_level;
        return CollisionOutcome::GroundImpact(impact);
    }

    // 2. Targets. Destroyed ones still linger in the registry but are skipped.
    if let Some(target) = targets.live().find(|target| hit_test.hits(position, target)) {
        return CollisionOutcome::TargetHit {
            target: target.id,
            impact: target.reference_point(),
        };
    }

    // 3. Lifetime, then the world bound. A round that is both reports Timeout.
    let reason = if projectile.is_expired(now) {
        Some(ExpiryReason::Timeout)
    } else if projectile.is_out_of_bounds() {
        Some(ExpiryReason::OutOfBounds)
    } else {
        None
    };

    match reason {
        Some(reason) => CollisionOutcome::Expired {
            point: position,
            reason,
            detonates: ballistics.detonates_on_expiry,
        },
        None => CollisionOutcome::NoHit,
    }
}
