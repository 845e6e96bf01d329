pub mod codec;
pub mod collision;
pub mod config;
pub mod damage;
pub mod error;
pub mod ids;
pub mod intent;
pub mod kinematics;
pub mod projectile;
pub mod session;
pub mod simulation;
pub mod snapshot;
pub mod target;
pub mod trajectory;
pub mod weapon;

pub use config::EngineConfig;
pub use damage::{ExplosionEvent, ExplosionSink, FalloffPolicy};
pub use error::EngineError;
pub use ids::{EquipmentId, ProjectileId, SessionId, TargetId};
pub use intent::Intent;
pub use simulation::{RetireReason, SimEvent, SimulationState, TickReport};
pub use snapshot::{HudSnapshot, HudThrottle, RenderSnapshot};
pub use target::{TargetCategory, TargetExtent};
pub use weapon::WeaponKind;
