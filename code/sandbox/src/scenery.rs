//! Destructible scenery the engine does not track: buildings and props placed
//! by the host. It listens to engine explosions and applies its own damage.

use engine::{ExplosionEvent, ExplosionSink, FalloffPolicy};
use glam::Vec3;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneryObject {
    pub name: String,
    pub position: Vec3,
    /// Half of the object's largest dimension.
    pub size: f32,
    pub health: f32,
}

impl SceneryObject {
    pub fn is_standing(&self) -> bool {
        self.health > 0.0
    }
}

#[derive(Debug, Default)]
pub struct SceneryRegistry {
    objects: Vec<SceneryObject>,
}

impl SceneryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, position: Vec3, size: f32, health: f32) {
        self.objects.push(SceneryObject {
            name: name.into(),
            position,
            size,
            health,
        });
    }

    pub fn objects(&self) -> &[SceneryObject] {
        &self.objects
    }

    pub fn standing(&self) -> usize {
        self.objects.iter().filter(|object| object.is_standing()).count()
    }
}

impl ExplosionSink for SceneryRegistry {
    /// Scenery always uses the unfloored falloff, whatever the weapon's own policy.
    fn on_explosion(&mut self, explosion: &ExplosionEvent) {
        let policy = FalloffPolicy::UnflooredLinear;

        for object in self.objects.iter_mut().filter(|object| object.is_standing()) {
            let effective = policy.effective_radius(explosion.radius, object.size);
            let distance = explosion.position.distance(object.position);
            if distance > effective {
                continue;
            }

            let damage = policy.damage(explosion.damage, policy.multiplier(distance, effective));
            object.health = (object.health - damage).max(0.0);
            if !object.is_standing() {
                info!(name = %object.name, "Scenery destroyed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn blast(position: Vec3, damage: f32, radius: f32) -> ExplosionEvent {
        ExplosionEvent {
            position,
            damage,
            radius,
            timestamp: Duration::ZERO,
            falloff: FalloffPolicy::FlooredLinear,
            source: None,
        }
    }

    #[test]
    fn scenery_ignores_the_weapon_falloff() {
        let mut scenery = SceneryRegistry::new();
        scenery.add("warehouse", Vec3::new(10.0, 0.0, 0.0), 6.0, 1000.0);

        scenery.on_explosion(&blast(Vec3::ZERO, 250.0, 20.0));

        // effective = 20 + 6 = 26, no tolerance and no flooring
        let expected = 1000.0 - 250.0 * (1.0 - 10.0 / 26.0);
        let health = scenery.objects()[0].health;
        assert!((health - expected).abs() < 1e-3, "got {health}");
    }

    #[test]
    fn edge_of_reach_deals_nothing() {
        let mut scenery = SceneryRegistry::new();
        scenery.add("fence", Vec3::new(0.0, 0.0, 26.0), 6.0, 50.0);
        scenery.add("tower", Vec3::new(0.0, 0.0, 40.0), 6.0, 50.0);

        scenery.on_explosion(&blast(Vec3::ZERO, 250.0, 20.0));

        assert_eq!(scenery.objects()[0].health, 50.0);
        assert_eq!(scenery.objects()[1].health, 50.0);
    }

    #[test]
    fn destroyed_objects_stop_taking_damage() {
        let mut scenery = SceneryRegistry::new();
        scenery.add("shed", Vec3::ZERO, 2.0, 100.0);

        scenery.on_explosion(&blast(Vec3::ZERO, 250.0, 5.0));
        assert_eq!(scenery.standing(), 0);
        assert_eq!(scenery.objects()[0].health, 0.0);

        scenery.on_explosion(&blast(Vec3::ZERO, 250.0, 5.0));
        assert_eq!(scenery.objects()[0].health, 0.0);
    }
}
