use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

use crate::ids::{EquipmentId, SessionId};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0} is not an active session")]
    UnknownSession(SessionId),
    #[error("{equipment} is already operated by {session}")]
    EquipmentInUse {
        equipment: EquipmentId,
        session: SessionId,
    },
    #[error("target max health must be finite and positive, got {max_health}")]
    InvalidTarget { max_health: f32 },
    #[error("failed to encode simulation snapshot")]
    SnapshotEncode(#[from] EncodeError),
    #[error("failed to decode simulation snapshot")]
    SnapshotDecode(#[from] DecodeError),
}
