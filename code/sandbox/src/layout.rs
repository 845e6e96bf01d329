use engine::{EngineError, SimulationState, TargetCategory, TargetExtent};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scenery::SceneryRegistry;

const NEAR: f32 = 20.0;
const FAR: f32 = 120.0;
const SPREAD: f32 = 30.0;
const AIR_ALTITUDE: f32 = 30.0;

/// Places engine targets and scenery in front of the origin (+Z).
/// The same seed always gives the same layout.
pub fn populate(
    seed: u64,
    targets: usize,
    scenery_count: usize,
    sim: &mut SimulationState,
    scenery: &mut SceneryRegistry,
) -> Result<(), EngineError> {
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..targets {
        let x = rng.random_range(-SPREAD..SPREAD);
        let z = rng.random_range(NEAR..FAR);
        let (category, position, health, extent) = match rng.random_range(0..3) {
            0 => (
                TargetCategory::AerialUnit,
                Vec3::new(x, AIR_ALTITUDE, z),
                150.0,
                TargetExtent {
                    radius: 2.0,
                    half_height: 1.0,
                },
            ),
            1 => (
                TargetCategory::Structure,
                Vec3::new(x, 0.0, z),
                800.0,
                TargetExtent {
                    radius: 5.0,
                    half_height: rng.random_range(3.0..8.0),
                },
            ),
            _ => (
                TargetCategory::GroundUnit,
                Vec3::new(x, 1.0, z),
                400.0,
                TargetExtent {
                    radius: 3.0,
                    half_height: 1.5,
                },
            ),
        };
        sim.spawn_target(category, position, health, extent)?;
    }

    for index in 0..scenery_count {
        let position = Vec3::new(
            rng.random_range(-SPREAD..SPREAD),
            0.0,
            rng.random_range(NEAR..FAR),
        );
        scenery.add(
            format!("building-{index}"),
            position,
            rng.random_range(4.0..10.0),
            1000.0,
        );
    }
    Ok(())
}
