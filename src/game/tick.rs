//! Frame Driver
//!
//! Applies one frame of shell input to the session and hands back what
//! happened. Single-threaded and synchronous: every input is fully resolved
//! before the next one is looked at.

use crate::game::contact::sync_bodies;
use crate::game::command::Command;
use crate::game::events::GameEvent;
use crate::game::fusion::{resolve_batch, FusionOutcome};
use crate::game::input::{InputEvent, InputFrame};
use crate::game::release::{move_pointer, release_aiming};
use crate::game::session::{check_overflow, end_session, start_session, toggle_mute};
use crate::game::state::{EndReason, GameState, SessionRules};

/// Result of a frame.
#[derive(Debug)]
#[derive(Default)]
pub struct TickResult {
    /// Events generated this frame
    pub events: Vec<GameEvent>,
    /// Collaborator commands to execute, in order
    pub commands: Vec<Command>,
    /// Resolver outcome for every collision delivered this frame
    pub outcomes: Vec<FusionOutcome>,
    /// Whether the session ended this frame
    pub session_ended: bool,
}

impl TickResult {
    /// Fusions performed this frame.
    pub fn fusion_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_fusion()).count()
    }
}

/// Run one frame.
///
/// Inputs are applied in delivery order. The overflow watchdog runs after
/// each body sync, since that is the only input that moves settled fruit.
pub fn tick(state: &mut GameState, frame: &InputFrame) -> TickResult {
    let mut result = TickResult::default();
    let was_ended = state.is_ended();

    for event in &frame.events {
        apply_input(state, event, &mut result);
    }

    result.events = state.take_events();
    result.commands = state.take_commands();
    result.session_ended = !was_ended && state.is_ended();
    result
}

/// Apply a single input.
fn apply_input(state: &mut GameState, event: &InputEvent, result: &mut TickResult) {
    match event {
        InputEvent::Start => {
            start_session(state);
        }
        InputEvent::ToggleMute => {
            toggle_mute(state);
        }
        InputEvent::EndRequested => {
            end_session(state, EndReason::Requested);
        }
        InputEvent::PointerMove(x) => move_pointer(state, *x),
        InputEvent::PointerDown => {
            release_aiming(state);
        }
        InputEvent::BodySync(bodies) => {
            sync_bodies(state, bodies);
            check_overflow(state);
        }
        InputEvent::Collisions(batch) => {
            result.outcomes.extend(resolve_batch(state, batch));
            state.remove_consumed();
        }
    }
}

/// Replay a session from recorded frames.
///
/// Returns the final state and every event produced along the way.
pub fn replay_session(
    rules: SessionRules,
    session_id: [u8; 16],
    rng_seed: u64,
    frames: &[InputFrame],
) -> (GameState, Vec<GameEvent>) {
    let mut state = GameState::new(session_id, rng_seed, rules);
    let mut all_events = Vec::new();

    for frame in frames {
        let result = tick(&mut state, frame);
        all_events.extend(result.events);
        if state.is_ended() {
            break;
        }
    }

    (state, all_events)
}
