//! Area damage from explosions.
//!
//! Two falloff rules exist and stay separate:
//!
//! * [`FalloffPolicy::FlooredLinear`] is used for tank, aircraft and artillery
//!   ordnance against the engine's target registry. The blast reach is padded by
//!   a fixed tolerance, damage never drops below 30% inside it, and the result
//!   is rounded down.
//! * [`FalloffPolicy::UnflooredLinear`] is used for small-arms rounds and by
//!   scenery registries owned outside the engine. Damage fades linearly to
//!   exactly zero at the edge and is not rounded.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ids::{SessionId, TargetId};
use crate::target::{DestructibleTarget, TargetRegistry};

pub const FALLOFF_FLOOR: f32 = 0.3;
pub const FALLOFF_TOLERANCE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FalloffPolicy {
    FlooredLinear,
    UnflooredLinear,
}

impl FalloffPolicy {
    pub fn effective_radius(self, blast_radius: f32, target_size: f32) -> f32 {
        match self {
            FalloffPolicy::FlooredLinear => blast_radius + target_size + FALLOFF_TOLERANCE,
            FalloffPolicy::UnflooredLinear => blast_radius + target_size,
        }
    }

    pub fn multiplier(self, distance: f32, effective_radius: f32) -> f32 {
        let linear = 1.0 - distance / effective_radius;
        match self {
            FalloffPolicy::FlooredLinear => linear.max(FALLOFF_FLOOR),
            FalloffPolicy::UnflooredLinear => linear.max(0.0),
        }
    }

    pub fn damage(self, weapon_damage: f32, multiplier: f32) -> f32 {
        match self {
            FalloffPolicy::FlooredLinear => (weapon_damage * multiplier).floor(),
            FalloffPolicy::UnflooredLinear => weapon_damage * multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionEvent {
    pub position: Vec3,
    pub damage: f32,
    pub radius: f32,
    pub timestamp: Duration,
    pub falloff: FalloffPolicy,
    pub source: Option<SessionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub target: TargetId,
    pub damage_applied: f32,
    pub new_health: f32,
    /// True only on the explosion that took the target from >0 to 0.
    pub destroyed: bool,
}

/// Receiver for explosions outside the engine's own registry (buildings and
/// units placed in the scene by the host).
pub trait ExplosionSink {
    fn on_explosion(&mut self, explosion: &ExplosionEvent);
}

/// Damage a single target would take, or `None` when it is out of reach or
/// the policy discards the hit.
pub fn damage_for(
    explosion: &ExplosionEvent,
    target: &DestructibleTarget,
    policy: FalloffPolicy,
) -> Option<f32> {
    let effective = policy.effective_radius(explosion.radius, target.size());
    let distance = explosion.position.distance(target.reference_point());
    if distance > effective {
        return None;
    }

    let multiplier = policy.multiplier(distance, effective);
    let damage = policy.damage(explosion.damage, multiplier);
    match policy {
        FalloffPolicy::FlooredLinear if damage <= 0.0 => None,
        _ => Some(damage),
    }
}

/// Applies an explosion to every live target within reach.
///
/// Targets already at 0 health are skipped. `destroyed_at` is stamped with the
/// explosion timestamp when a target dies.
pub fn resolve(
    explosion: &ExplosionEvent,
    registry: &mut TargetRegistry,
    policy: FalloffPolicy,
) -> Vec<DamageReport> {
    let mut reports = Vec::new();

    for target in registry.iter_mut().filter(|target| target.is_alive()) {
        let Some(damage) = damage_for(explosion, target, policy) else {
            continue;
        };

        target.health = (target.health - damage).max(0.0);
        let destroyed = !target.is_alive();
        if destroyed {
            target.destroyed_at = Some(explosion.timestamp);
        }

        reports.push(DamageReport {
            target: target.id,
            damage_applied: damage,
            new_health: target.health,
            destroyed,
        });
    }

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{TargetCategory, TargetExtent};

    fn explosion(position: Vec3, damage: f32, radius: f32) -> ExplosionEvent {
        ExplosionEvent {
            position,
            damage,
            radius,
            timestamp: Duration::from_millis(500),
            falloff: FalloffPolicy::FlooredLinear,
            source: None,
        }
    }

    /// Six units across, so its size term is 3.
    fn six_wide() -> TargetExtent {
        TargetExtent {
            radius: 3.0,
            half_height: 1.0,
        }
    }

    #[test]
    fn multiplier_endpoints() {
        let floored = FalloffPolicy::FlooredLinear;
        let unfloored = FalloffPolicy::UnflooredLinear;

        assert_eq!(floored.multiplier(0.0, 26.0), 1.0);
        assert_eq!(floored.multiplier(26.0, 26.0), 0.3);
        assert_eq!(unfloored.multiplier(0.0, 20.0), 1.0);
        assert_eq!(unfloored.multiplier(20.0, 20.0), 0.0);
    }

    #[test]
    fn floored_scenario_with_tank_shell() {
        // 250 damage, 20 blast, 6 wide, 10 away: effective 20 + 3 + 3 = 26, multiplier ~0.615, 153 damage.
        let mut registry = TargetRegistry::new();
        let id = registry
            .spawn(TargetCategory::GroundUnit, Vec3::new(10.0, 0.0, 0.0), 400.0, six_wide())
            .expect("valid target");

        let blast = explosion(Vec3::ZERO, 250.0, 20.0);
        assert_eq!(FalloffPolicy::FlooredLinear.effective_radius(20.0, 3.0), 26.0);

        let reports = resolve(&blast, &mut registry, FalloffPolicy::FlooredLinear);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].target, id);
        assert_eq!(reports[0].damage_applied, 153.0);
        assert_eq!(reports[0].new_health, 247.0);
        assert!(!reports[0].destroyed);
    }

    #[test]
    fn unfloored_policy_drops_the_tolerance_and_the_rounding() {
        let mut registry = TargetRegistry::new();
        registry
            .spawn(TargetCategory::GroundUnit, Vec3::new(10.0, 0.0, 0.0), 400.0, six_wide())
            .expect("valid target");

        let blast = explosion(Vec3::ZERO, 250.0, 20.0);
        assert_eq!(FalloffPolicy::UnflooredLinear.effective_radius(20.0, 3.0), 26.0 - FALLOFF_TOLERANCE);

        let reports = resolve(&blast, &mut registry, FalloffPolicy::UnflooredLinear);
        let expected = 250.0 * (1.0 - 10.0 / 23.0);
        assert!((reports[0].damage_applied - expected).abs() < 1e-3);
        assert_ne!(reports[0].damage_applied, reports[0].damage_applied.floor());
    }

    #[test]
    fn floored_edge_still_deals_thirty_percent() {
        let mut registry = TargetRegistry::new();
        // 26 away from the blast: exactly on the floored reach.
        registry
            .spawn(TargetCategory::GroundUnit, Vec3::new(26.0, 0.0, 0.0), 400.0, six_wide())
            .expect("valid target");
        let blast = explosion(Vec3::ZERO, 250.0, 20.0);

        let reports = resolve(&blast, &mut registry, FalloffPolicy::FlooredLinear);
        assert_eq!(reports[0].damage_applied, 75.0);
        assert_eq!(reports[0].new_health, 325.0);
    }

    #[test]
    fn unfloored_edge_applies_zero_damage() {
        let mut scenery = TargetRegistry::new();
        // 20 + 3 = 23 is the unfloored reach; the target sits exactly on it.
        scenery
            .spawn(TargetCategory::GroundUnit, Vec3::new(23.0, 0.0, 0.0), 400.0, six_wide())
            .expect("valid target");
        let blast = explosion(Vec3::ZERO, 250.0, 20.0);

        let reports = resolve(&blast, &mut scenery, FalloffPolicy::UnflooredLinear);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].damage_applied, 0.0);
        assert_eq!(reports[0].new_health, 400.0);
        assert!(!reports[0].destroyed);
    }

    #[test]
    fn destroyed_is_reported_once() {
        let mut registry = TargetRegistry::new();
        let id = registry
            .spawn(TargetCategory::GroundUnit, Vec3::ZERO, 100.0, six_wide())
            .expect("valid target");
        let blast = explosion(Vec3::ZERO, 250.0, 20.0);

        let first = resolve(&blast, &mut registry, FalloffPolicy::FlooredLinear);
        assert_eq!(first.len(), 1);
        assert!(first[0].destroyed);
        assert_eq!(first[0].new_health, 0.0);
        assert_eq!(
            registry.get(id).and_then(|t| t.destroyed_at),
            Some(Duration::from_millis(500))
        );

        let second = resolve(&blast, &mut registry, FalloffPolicy::FlooredLinear);
        assert!(second.is_empty(), "Dead targets are skipped");
    }

    #[test]
    fn floored_zero_damage_is_not_applied() {
        let mut registry = TargetRegistry::new();
        registry
            .spawn(TargetCategory::GroundUnit, Vec3::new(20.0, 0.0, 0.0), 100.0, six_wide())
            .expect("valid target");
        // 1 * 0.3 rounds down to 0.
        let blast = explosion(Vec3::ZERO, 1.0, 20.0);
        assert!(resolve(&blast, &mut registry, FalloffPolicy::FlooredLinear).is_empty());
    }
}
