use glam::Vec3;

use crate::kinematics::integrate;
use crate::weapon::WeaponKind;

pub const MAX_PREDICTION_STEPS: usize = 500;

/// Forward-simulates a shot from `origin` along `direction` and returns where
/// it reaches the ground (y <= 0).
///
/// Only the integrator runs: no targets, no ammo or cooldown, nothing is
/// spawned. If the shot is still airborne after [`MAX_PREDICTION_STEPS`] the
/// last computed point is returned.
pub fn predict_landing(origin: Vec3, direction: Vec3, weapon: WeaponKind, step: f32) -> Vec3 {
    let profile = weapon.profile();
    let ballistics = profile.projectile.ballistics();

    let mut position = origin;
    let mut velocity = direction.normalize_or_zero() * profile.muzzle_speed;

    for _ in 0..MAX_PREDICTION_STEPS {
        (position, velocity) = integrate(position, velocity, ballistics, step);
        if position.y <= 0.0 {
            break;
        }
    }

    position
}
