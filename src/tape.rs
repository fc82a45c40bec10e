//! Session Tapes
//!
//! The runner records every frame it feeds the core. Encoding the tape,
//! decoding it and replaying it must land on the live session's hash.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use fruit_fusion::{
    core::hash::StateHash,
    game::{
        input::InputFrame,
        state::SessionRules,
        tick::replay_session,
    },
};

/// Tape format version written into every encoding.
pub const TAPE_VERSION: u16 = 1;

/// Tape encode/decode failures.
#[derive(Debug, Error)]
pub enum TapeError {
    /// bincode could not encode or decode the tape.
    #[error("tape codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Tape was written by an incompatible version.
    #[error("unsupported tape version {found}, expected {TAPE_VERSION}")]
    Version {
        /// Version found in the data
        found: u16,
    },
}

/// A recorded session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTape {
    pub version: u16,
    pub session_id: [u8; 16],
    pub rng_seed: u64,
    pub frames: Vec<InputFrame>,
}

impl SessionTape {
    pub fn new(session_id: [u8; 16], rng_seed: u64) -> Self {
        Self {
            version: TAPE_VERSION,
            session_id,
            rng_seed,
            frames: Vec::new(),
        }
    }

    pub fn record(&mut self, frame: InputFrame) {
        self.frames.push(frame);
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TapeError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode, rejecting other format versions.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TapeError> {
        let tape: Self = bincode::deserialize(bytes)?;
        if tape.version != TAPE_VERSION {
            return Err(TapeError::Version { found: tape.version });
        }
        Ok(tape)
    }

    /// State hash after replaying every frame against `rules`.
    pub fn final_hash(&self, rules: SessionRules) -> StateHash {
        let (state, _) = replay_session(rules, self.session_id, self.rng_seed, &self.frames);
        state.compute_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fruit_fusion::{
        config::GameConfig,
        core::fixed::to_fixed,
        game::{input::InputEvent, state::GameState, tick::tick},
    };

    fn rules() -> SessionRules {
        GameConfig::default().build_rules().unwrap()
    }

    fn recorded_session() -> (SessionTape, GameState) {
        let mut state = GameState::new([4; 16], 2024, rules());
        let mut tape = SessionTape::new(state.session_id, state.rng_seed);

        let mut frames = vec![InputFrame::from(vec![InputEvent::Start])];
        for i in 0..10 {
            frames.push(InputFrame::from(vec![
                InputEvent::PointerMove(to_fixed(50.0 + 25.0 * i as f64)),
                InputEvent::PointerDown,
            ]));
        }
        frames.push(InputFrame::from(vec![InputEvent::ToggleMute]));

        for frame in frames {
            tick(&mut state, &frame);
            tape.record(frame);
        }
        (tape, state)
    }

    #[test]
    fn test_tape_replays_live_session() {
        let (tape, live) = recorded_session();
        assert_eq!(tape.final_hash(rules()), live.compute_hash());
    }

    #[test]
    fn test_tape_bytes_replay_identically() {
        let (tape, live) = recorded_session();
        let bytes = tape.to_bytes().unwrap();
        let decoded = SessionTape::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, tape);
        assert_eq!(decoded.final_hash(rules()), live.compute_hash());
    }

    #[test]
    fn test_rejects_other_version() {
        let mut tape = SessionTape::new([0; 16], 1);
        tape.version = 99;
        let bytes = tape.to_bytes().unwrap();
        assert!(matches!(
            SessionTape::from_bytes(&bytes),
            Err(TapeError::Version { found: 99 })
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            SessionTape::from_bytes(&[0xff, 0x01]),
            Err(TapeError::Codec(_))
        ));
    }
}
