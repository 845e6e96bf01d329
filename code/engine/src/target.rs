use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ids::TargetId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetCategory {
    GroundUnit,
    AerialUnit,
    Structure,
}

impl TargetCategory {
    /// Radius a projectile has to get within to count as a hit.
    pub fn collision_radius(self) -> f32 {
        match self {
            TargetCategory::GroundUnit => 3.0,
            TargetCategory::Structure => 5.0,
            _ => 2.0,
        }
    }
}

/// Physical size of a target. Units only use `radius`; structures are extruded
/// upwards by `2 * half_height` from their position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetExtent {
    pub radius: f32,
    pub half_height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestructibleTarget {
    pub id: TargetId,
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub category: TargetCategory,
    pub extent: TargetExtent,
    /// Simulation time at which health reached 0.
    pub destroyed_at: Option<Duration>,
}

impl DestructibleTarget {
    pub fn new(
        id: TargetId,
        category: TargetCategory,
        position: Vec3,
        max_health: f32,
        extent: TargetExtent,
    ) -> Self {
        Self {
            id,
            position,
            health: max_health,
            max_health,
            category,
            extent,
            destroyed_at: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// The point hit tests and blast distances are measured against.
    pub fn reference_point(&self) -> Vec3 {
        match self.category {
            TargetCategory::Structure => self.position + Vec3::Y * self.extent.half_height,
            _ => self.position,
        }
    }

    /// Half of the target's largest dimension.
    pub fn size(&self) -> f32 {
        self.extent.radius.max(self.extent.half_height)
    }
}

/// Targets in insertion order. Order matters: hit tests pick the first match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetRegistry {
    targets: Vec<DestructibleTarget>,
    next_id: u64,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(
        &mut self,
        category: TargetCategory,
        position: Vec3,
        max_health: f32,
        extent: TargetExtent,
    ) -> Result<TargetId, EngineError> {
        // NaN fails both comparisons, so test for the good range.
        if !(max_health.is_finite() && max_health > 0.0) {
            return Err(EngineError::InvalidTarget { max_health });
        }
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.targets
            .push(DestructibleTarget::new(id, category, position, max_health, extent));
        Ok(id)
    }

    pub fn get(&self, id: TargetId) -> Option<&DestructibleTarget> {
        self.targets.iter().find(|target| target.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DestructibleTarget> {
        self.targets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DestructibleTarget> {
        self.targets.iter_mut()
    }

    pub fn live(&self) -> impl Iterator<Item = &DestructibleTarget> {
        self.targets.iter().filter(|target| target.is_alive())
    }

    /// Drops destroyed targets whose destruction effects have played out.
    /// Returns the removed ids.
    pub fn purge_destroyed(&mut self, now: Duration, delay: Duration) -> Vec<TargetId> {
        let mut removed = Vec::new();
        self.targets.retain(|target| match target.destroyed_at {
            Some(at) if now.saturating_sub(at) >= delay => {
                removed.push(target.id);
                false
            }
            _ => true,
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
