use bincode::serde::{decode_from_slice, encode_to_vec};

use crate::error::EngineError;
use crate::simulation::SimulationState;

fn bincode_config() -> impl bincode::config::Config {
    bincode::config::standard()
}

/// Serialize the whole simulation (clock, sessions, projectiles, targets,
/// pending intents and timers) into a byte vector.
pub fn encode_state(state: &SimulationState) -> Result<Vec<u8>, EngineError> {
    Ok(encode_to_vec(state, bincode_config())?)
}

/// Rebuild a simulation from [`encode_state`] output. Continuing the decoded
/// copy with the same intents and deltas reproduces the original bit for bit.
pub fn decode_state(bytes: &[u8]) -> Result<SimulationState, EngineError> {
    let (state, _) = decode_from_slice(bytes, bincode_config())?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::EquipmentId;
    use crate::intent::Intent;
    use crate::target::{TargetCategory, TargetExtent};
    use crate::weapon::WeaponKind;
    use glam::Vec3;
    use std::time::Duration;

    #[test]
    fn state_with_inflight_work_roundtrip() {
        let mut state = SimulationState::default();
        let session = state
            .open_session(EquipmentId(3), WeaponKind::Artillery, Vec3::ZERO, 0.0)
            .unwrap();
        state.spawn_target(
            TargetCategory::Structure,
            Vec3::new(0.0, 0.0, 80.0),
            600.0,
            TargetExtent {
                radius: 4.0,
                half_height: 5.0,
            },
        )
        .expect("valid target");
        state.enqueue(session, Intent::FireDown);
        state.tick(Duration::from_millis(16));
        state.enqueue(session, Intent::ReloadPressed);
        state.enqueue(session, Intent::AimDelta { dx: 4.0, dy: -2.0 });

        let encoded = encode_state(&state).unwrap();
        let decoded = decode_state(&encoded).unwrap();
        assert_eq!(state, decoded);
    }

    #[test]
    fn truncated_bytes_are_rejected() {
        let encoded = encode_state(&SimulationState::default()).unwrap();
        let err = decode_state(&encoded[..encoded.len() / 2]).unwrap_err();
        assert!(matches!(err, EngineError::SnapshotDecode(_)));
    }
}
