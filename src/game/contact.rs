//! Physics Boundary
//!
//! Position sync from the physics collaborator, plus a circle-overlap
//! contact scan for runs with no real engine attached.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::game::entity::EntityId;
use crate::game::fusion::CollisionEvent;
use crate::game::state::GameState;

/// Latest simulated position of one body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySync {
    /// Body owner
    pub entity: EntityId,
    /// Body centre
    pub position: FixedVec2,
}

/// Store body positions reported after a physics step.
///
/// Reports for entities that are not Active are dropped; a fused fruit's
/// body may still be in the engine's last step. Positions are clamped into
/// the playfield.
pub fn sync_bodies(state: &mut GameState, bodies: &[BodySync]) {
    if !state.is_running() {
        return;
    }
    let playfield = state.rules.playfield;
    for sync in bodies {
        if let Some(entity) = state.get_mut(sync.entity) {
            if entity.is_active() {
                entity.position = playfield.clamp(sync.position);
                entity.active_steps = entity.active_steps.saturating_add(1);
            }
        }
    }
}

/// Check if two circles overlap (touching counts).
#[inline]
pub fn circles_overlap(pos_a: FixedVec2, radius_a: Fixed, pos_b: FixedVec2, radius_b: Fixed) -> bool {
    let combined = radius_a as i64 + radius_b as i64;
    let combined_sq = (combined * combined) >> crate::core::fixed::FIXED_SCALE;
    pos_a.distance_squared(pos_b) <= combined_sq
}

/// All touching pairs of Active entities, lower ID first, in ID order.
pub fn find_contacts(state: &GameState) -> Vec<CollisionEvent> {
    let bodies: Vec<(EntityId, FixedVec2, Fixed)> = state
        .active_entities()
        .filter_map(|e| e.body.map(|b| (e.id, e.position, b.radius)))
        .collect();

    let mut contacts = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (id_a, pos_a, r_a) = bodies[i];
            let (id_b, pos_b, r_b) = bodies[j];
            if circles_overlap(pos_a, r_a, pos_b, r_b) {
                contacts.push(CollisionEvent::new(id_a, id_b));
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;
    use crate::game::fusion::resolve_batch;
    use crate::game::session::check_overflow;
    use crate::game::state::test_support::*;
    use crate::game::state::OverflowRule;

    #[test]
    fn test_circles_overlap() {
        let a = FixedVec2::ZERO;
        let b = FixedVec2::new(to_fixed(1.0), 0);
        let r = to_fixed(0.6);
        assert!(circles_overlap(a, r, b, r));

        let c = FixedVec2::new(to_fixed(2.0), 0);
        assert!(!circles_overlap(a, r, c, r));
    }

    #[test]
    fn test_sync_updates_active_only() {
        let mut state = running_state();
        let a = place_active(&mut state, "small", 0, 0);
        crate::game::spawn::spawn_next(&mut state);
        let aiming = state.aiming.unwrap();
        let aiming_pos = state.get(aiming).unwrap().position;

        sync_bodies(
            &mut state,
            &[
                BodySync { entity: a, position: FixedVec2::from_ints(3, 4) },
                BodySync { entity: aiming, position: FixedVec2::from_ints(9, 9) },
                BodySync { entity: EntityId(404), position: FixedVec2::ZERO },
            ],
        );

        let entity = state.get(a).unwrap();
        assert_eq!(entity.position, FixedVec2::from_ints(3, 4));
        assert_eq!(entity.active_steps, 1);
        assert_eq!(state.get(aiming).unwrap().position, aiming_pos);
    }

    #[test]
    fn test_find_contacts() {
        let mut state = running_state();
        // small radius is 5
        let a = place_active(&mut state, "small", 0, 0);
        let b = place_active(&mut state, "small", 8, 0);
        let c = place_active(&mut state, "small", 100, 0);
        let d = place_active(&mut state, "medium", 100, 12);

        let contacts = find_contacts(&state);
        assert_eq!(
            contacts,
            vec![CollisionEvent::new(a, b), CollisionEvent::new(c, d)]
        );
    }

    #[test]
    fn test_contacts_feed_resolver() {
        let mut state = running_state();
        place_active(&mut state, "small", 0, 0);
        place_active(&mut state, "small", 9, 0);
        place_active(&mut state, "small", 18, 0);

        // a-b and b-c touch; b can only fuse once
        let contacts = find_contacts(&state);
        assert_eq!(contacts.len(), 2);
        let outcomes = resolve_batch(&mut state, &contacts);
        assert_eq!(outcomes.iter().filter(|o| o.is_fusion()).count(), 1);
    }

    #[test]
    fn test_sync_clamps_out_of_range_positions() {
        let mut state = running_state();
        state.rules.overflow = Some(OverflowRule { line_y: to_fixed(50.0), grace_steps: 1 });
        let a = place_active(&mut state, "small", 100, 300);
        let b = place_active(&mut state, "small", 200, 300);
        let c = place_active(&mut state, "medium", 300, 300);

        sync_bodies(
            &mut state,
            &[
                BodySync { entity: a, position: FixedVec2::new(i32::MIN, i32::MAX) },
                BodySync { entity: b, position: FixedVec2::new(i32::MAX, i32::MIN) },
                BodySync { entity: c, position: FixedVec2::new(i32::MAX, i32::MAX) },
            ],
        );

        let field = state.rules.playfield;
        assert_eq!(state.get(a).unwrap().position, FixedVec2::new(0, field.height));
        assert_eq!(state.get(b).unwrap().position, FixedVec2::new(field.width, 0));
        assert_eq!(state.get(c).unwrap().position, FixedVec2::new(field.width, field.height));

        // Far corners do not touch; b sits on the top edge and overflows
        assert!(find_contacts(&state).is_empty());
        assert_eq!(check_overflow(&mut state), Some(b));
    }
}
