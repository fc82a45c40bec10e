//! Session Controller
//!
//! Start gate, mute toggle, and the single termination path every ending
//! (top-tier collision, overflow, shell request) goes through.

use tracing::{debug, info};

use crate::core::fixed::fixed_half;
use crate::game::command::Command;
use crate::game::entity::EntityId;
use crate::game::events::GameEventData;
use crate::game::spawn::spawn_next;
use crate::game::state::{EndReason, GameState, SessionPhase};

/// Leave the start screen and begin accepting input.
///
/// Only valid from `Waiting`; returns whether the session started.
pub fn start_session(state: &mut GameState) -> bool {
    if state.phase != SessionPhase::Waiting {
        return false;
    }

    state.phase = SessionPhase::Running;
    info!("session {} started", hex::encode(&state.session_id[..4]));

    state.push_event(GameEventData::SessionStarted);
    state.push_command(Command::StartMusic);
    if state.muted {
        state.push_command(Command::PauseMusic);
    }
    spawn_next(state);
    true
}

/// Flip the mute flag. Returns the new value.
///
/// Affects background music only; gameplay is untouched.
pub fn toggle_mute(state: &mut GameState) -> bool {
    state.muted = !state.muted;
    debug!("muted = {}", state.muted);

    let command = if state.muted {
        Command::PauseMusic
    } else {
        Command::ResumeMusic
    };
    state.push_command(command);
    state.push_event(GameEventData::MuteToggled { muted: state.muted });
    state.muted
}

/// End the session. Returns false if it had already ended.
///
/// After this, spawn, drop and fusion are all no-ops.
pub fn end_session(state: &mut GameState, reason: EndReason) -> bool {
    if state.is_ended() {
        return false;
    }

    state.phase = SessionPhase::Ended;
    state.end_reason = Some(reason);
    info!(
        "session {} ended: {:?} after {} fusions",
        hex::encode(&state.session_id[..4]),
        reason,
        state.fusions
    );

    state.push_event(GameEventData::SessionEnded { reason });
    state.push_command(Command::ShowEndScreen { reason });
    true
}

/// Overflow watchdog.
///
/// Ends the session when an Active fruit that has been simulated for the
/// grace period still has its top edge above the overflow line. Returns the
/// offending entity.
pub fn check_overflow(state: &mut GameState) -> Option<EntityId> {
    if !state.is_running() {
        return None;
    }
    let rule = state.rules.overflow?;

    let catalog = &state.rules.catalog;
    let offender = state
        .active_entities()
        .filter(|e| e.active_steps >= rule.grace_steps)
        .find(|e| {
            let top = e.position.y.saturating_sub(fixed_half(catalog.size_of(e.tier)));
            top < rule.line_y
        })
        .map(|e| e.id)?;

    end_session(state, EndReason::Overflow { entity: offender });
    Some(offender)
}
