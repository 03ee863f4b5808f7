//! Session snapshots
//!
//! Features:
//! - Versioned JSON envelope around the serializable `GameState`
//! - Typed decode errors
//! - LocalStorage slot helpers (wasm32 only; no-ops natively)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::GameState;

/// Envelope format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// LocalStorage key for the in-progress run
pub const SESSION_KEY: &str = "pin_ring_session";

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    state: GameState,
}

/// Serialize a session snapshot
pub fn encode(state: &GameState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: SNAPSHOT_VERSION,
        state,
    })?)
}

/// Restore a session snapshot
pub fn decode(json: &str) -> Result<GameState, PersistError> {
    let envelope: Envelope = serde_json::from_str(json)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(PersistError::VersionMismatch {
            found: envelope.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    envelope.state.tuning.validate()?;
    Ok(envelope.state)
}

/// Store the current run so it can be continued later
pub fn save_session(state: &GameState) {
    match encode(state) {
        Ok(json) => {
            if crate::platform::storage_set(SESSION_KEY, &json) {
                log::info!("Session saved (level {})", state.level);
            }
        }
        Err(e) => log::warn!("Failed to encode session: {e}"),
    }
}

/// Load a previously stored run, discarding it if unreadable
pub fn load_session() -> Option<GameState> {
    let json = crate::platform::storage_get(SESSION_KEY)?;
    match decode(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("Discarding saved session: {e}");
            clear_session();
            None
        }
    }
}

pub fn clear_session() {
    crate::platform::storage_remove(SESSION_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, start_game, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_encode_decode_preserves_state() {
        let mut state = GameState::new(42, Tuning::default());
        start_game(&mut state);
        tick(&mut state, &TickInput { shoot: true }, 1.0);

        let json = encode(&state).expect("encode");
        let restored = decode(&json).expect("decode");
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            serde_json::to_string(&restored).unwrap()
        );
    }

    #[test]
    fn test_decode_rejects_other_version() {
        let state = GameState::new(1, Tuning::default());
        let json = encode(&state).unwrap().replacen(
            &format!("\"version\":{SNAPSHOT_VERSION}"),
            "\"version\":99",
            1,
        );
        assert!(matches!(
            decode(&json),
            Err(PersistError::VersionMismatch { found: 99, expected: SNAPSHOT_VERSION })
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(PersistError::Json(_))));
    }
}
