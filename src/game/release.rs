//! Drop Controller
//!
//! Releases the aiming fruit into the physics world and hands the player the
//! next one.

use tracing::debug;

use crate::core::fixed::Fixed;
use crate::game::command::{Command, Sound};
use crate::game::entity::{BodyParams, EntityId};
use crate::game::events::GameEventData;
use crate::game::spawn::{spawn_next, SpawnOutcome};
use crate::game::state::GameState;

/// Result of a release request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// `dropped` is now Active; `next` is the follow-up spawn.
    Dropped {
        dropped: EntityId,
        next: SpawnOutcome,
    },
    /// Nothing was aiming.
    NothingAiming,
    /// Session is not running.
    Inactive,
}

/// Move the aiming fruit to the pointer x.
///
/// The pointer is remembered even with nothing aiming, so the next spawn
/// appears under it.
pub fn move_pointer(state: &mut GameState, x: Fixed) {
    if !state.is_running() {
        return;
    }
    state.pointer_x = state.rules.playfield.clamp_x(x);

    let Some(id) = state.aiming else {
        return;
    };
    let pointer_x = state.pointer_x;
    if let Some(entity) = state.get_mut(id) {
        entity.position = entity.position.with_x(pointer_x);
        let position = entity.position;
        state.push_command(Command::MoveVisual { entity: id, position });
    }
}

/// Drop the aiming fruit, then spawn the next one.
///
/// At most one fruit is dropped per call; with nothing aiming this is a no-op.
pub fn release_aiming(state: &mut GameState) -> ReleaseOutcome {
    if !state.is_running() {
        return ReleaseOutcome::Inactive;
    }
    let Some(id) = state.aiming.take() else {
        return ReleaseOutcome::NothingAiming;
    };

    let Some(tier) = state.get(id).map(|e| e.tier) else {
        return ReleaseOutcome::NothingAiming;
    };
    let params = BodyParams::for_size(state.rules.body, state.catalog().size_of(tier));
    let position = match state.get_mut(id) {
        Some(entity) if entity.is_aiming() => {
            entity.activate(params);
            entity.position
        }
        _ => return ReleaseOutcome::NothingAiming,
    };

    debug!("dropped {} at {}", id, position);

    state.push_command(Command::PlaySound(Sound::Click));
    state.push_command(Command::AttachBody { entity: id, params });
    state.push_event(GameEventData::Dropped { entity: id, tier, position });

    let next = spawn_next(state);
    ReleaseOutcome::Dropped { dropped: id, next }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;
    use crate::game::entity::EntityState;
    use crate::game::state::test_support::*;
    use crate::game::state::SessionPhase;

    #[test]
    fn test_release_activates_and_respawns() {
        let mut state = running_state();
        let SpawnOutcome::Spawned(first) = spawn_next(&mut state) else {
            panic!("expected a spawn");
        };
        state.take_commands();

        let outcome = release_aiming(&mut state);
        let ReleaseOutcome::Dropped { dropped, next: SpawnOutcome::Spawned(second) } = outcome else {
            panic!("unexpected outcome {:?}", outcome);
        };
        assert_eq!(dropped, first);
        assert_ne!(second, first);

        let entity = state.get(first).unwrap();
        assert_eq!(entity.state, EntityState::Active);
        let body = entity.body.unwrap();
        assert_eq!(body.radius, state.catalog().size_of(entity.tier) / 2);
        assert_eq!(body.profile, state.rules.body);

        assert_eq!(state.aiming, Some(second));
        assert_eq!(state.count_in_state(EntityState::Aiming), 1);

        let commands = state.take_commands();
        assert_eq!(commands[0], Command::PlaySound(Sound::Click));
        assert!(matches!(commands[1], Command::AttachBody { entity, .. } if entity == first));
        assert!(matches!(commands[2], Command::CreateVisual { entity, .. } if entity == second));
    }

    #[test]
    fn test_release_without_aiming_is_noop() {
        let mut state = running_state();
        assert_eq!(release_aiming(&mut state), ReleaseOutcome::NothingAiming);
        assert!(state.entities.is_empty());
        assert!(state.take_commands().is_empty());
    }

    #[test]
    fn test_release_when_ended_is_noop() {
        let mut state = running_state();
        spawn_next(&mut state);
        state.phase = SessionPhase::Ended;

        assert_eq!(release_aiming(&mut state), ReleaseOutcome::Inactive);
        assert_eq!(state.count_in_state(EntityState::Aiming), 1);
    }

    #[test]
    fn test_pointer_moves_aiming_entity() {
        let mut state = running_state();
        spawn_next(&mut state);
        state.take_commands();

        move_pointer(&mut state, to_fixed(75.0));
        assert_eq!(state.aiming_entity().unwrap().position.x, to_fixed(75.0));
        assert!(matches!(state.take_commands()[0], Command::MoveVisual { .. }));

        // Clamped to the playfield
        move_pointer(&mut state, to_fixed(-50.0));
        assert_eq!(state.aiming_entity().unwrap().position.x, 0);
        move_pointer(&mut state, to_fixed(9000.0));
        assert_eq!(state.pointer_x, state.rules.playfield.width);
    }

    #[test]
    fn test_next_spawn_uses_remembered_pointer() {
        let mut state = running_state();
        move_pointer(&mut state, to_fixed(42.0));
        spawn_next(&mut state);
        assert_eq!(state.aiming_entity().unwrap().position.x, to_fixed(42.0));
    }
}
