//! Session State
//!
//! Everything one game session owns: the catalog, the entities, the aiming
//! singleton, session phase, mute flag and the two outboxes (events and
//! collaborator commands). Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::config::GameConfig;
use crate::core::fixed::{Fixed, fixed_clamp};
use crate::core::vec2::FixedVec2;
use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::command::Command;
use crate::game::entity::{BodyProfile, Entity, EntityId, EntityState};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::tier::{TierCatalog, TierId};

// =============================================================================
// SESSION PHASE
// =============================================================================

/// Why a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Two top-tier fruits collided; there is nothing left to fuse into.
    TopTierCollision {
        /// Tier of the colliding pair
        tier: TierId,
    },
    /// A settled fruit poked above the overflow line.
    Overflow {
        /// First fruit found above the line
        entity: EntityId,
    },
    /// The shell asked for the session to end.
    Requested,
}

/// Current phase of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum SessionPhase {
    /// Behind the start screen; only mute is accepted
    #[default]
    Waiting,
    /// Accepting input, collisions and spawns
    Running,
    /// Terminal
    Ended,
}

// =============================================================================
// PLAYFIELD
// =============================================================================

/// Playfield geometry in fixed-point units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playfield {
    /// Width (x in [0, width])
    pub width: Fixed,
    /// Height (y in [0, height], y grows down)
    pub height: Fixed,
    /// y-coordinate new aiming fruits appear at
    pub entry_y: Fixed,
}

impl Playfield {
    /// Clamp a pointer x into the playfield.
    #[inline]
    pub fn clamp_x(&self, x: Fixed) -> Fixed {
        fixed_clamp(x, 0, self.width)
    }

    /// Clamp a point into the playfield rectangle.
    #[inline]
    pub fn clamp(&self, pos: FixedVec2) -> FixedVec2 {
        FixedVec2::new(self.clamp_x(pos.x), fixed_clamp(pos.y, 0, self.height))
    }
}

/// Overflow watchdog settings (see `session::check_overflow`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverflowRule {
    /// A fruit whose top edge is above this y counts as overflowing
    pub line_y: Fixed,
    /// Syncs a fruit must have been simulated for before it can overflow
    pub grace_steps: u32,
}

/// Frozen per-session rules derived from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRules {
    /// Tier table
    pub catalog: TierCatalog,
    /// Geometry
    pub playfield: Playfield,
    /// Body parameters for every fruit
    pub body: BodyProfile,
    /// Fusion flash lifetime
    pub fusion_effect_ms: u32,
    /// Overflow watchdog, `None` when disabled
    pub overflow: Option<OverflowRule>,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of a session.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Session identifier
    pub session_id: [u8; 16],

    /// RNG seed (for replay)
    pub rng_seed: u64,

    /// Spawn RNG
    pub rng: DeterministicRng,

    /// Immutable rules
    pub rules: SessionRules,

    /// Current phase
    pub phase: SessionPhase,

    /// Why the session ended, once it has
    pub end_reason: Option<EndReason>,

    /// Background music muted
    pub muted: bool,

    /// Live entities (Aiming and Active); consumed ones are pruned after
    /// each collision batch
    pub entities: BTreeMap<EntityId, Entity>,

    /// The player-controlled entity, if any
    pub aiming: Option<EntityId>,

    /// Last pointer x, clamped to the playfield
    pub pointer_x: Fixed,

    /// Next entity ID (monotonic counter)
    pub next_entity_id: u32,

    /// Next event sequence number
    pub next_event_seq: u64,

    /// Number of fusions performed
    pub fusions: u32,

    /// Events generated since the last drain
    pending_events: Vec<GameEvent>,

    /// Collaborator commands since the last drain
    pending_commands: Vec<Command>,
}

impl GameState {
    /// Create a session from validated rules.
    ///
    /// The pointer starts at the horizontal centre of the playfield.
    pub fn new(session_id: [u8; 16], rng_seed: u64, rules: SessionRules) -> Self {
        let pointer_x = rules.playfield.width >> 1;
        Self {
            session_id,
            rng_seed,
            rng: DeterministicRng::new(rng_seed),
            rules,
            phase: SessionPhase::Waiting,
            end_reason: None,
            muted: false,
            entities: BTreeMap::new(),
            aiming: None,
            pointer_x,
            next_entity_id: 0,
            next_event_seq: 0,
            fusions: 0,
            pending_events: Vec::new(),
            pending_commands: Vec::new(),
        }
    }

    /// Create a session straight from configuration.
    pub fn from_config(
        session_id: [u8; 16],
        rng_seed: u64,
        config: &GameConfig,
    ) -> Result<Self, crate::config::ConfigError> {
        Ok(Self::new(session_id, rng_seed, config.build_rules()?))
    }

    /// Tier table.
    #[inline]
    pub fn catalog(&self) -> &TierCatalog {
        &self.rules.catalog
    }

    /// Whether input, spawns and fusions are accepted.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Whether the session has ended.
    #[inline]
    pub fn is_ended(&self) -> bool {
        self.phase == SessionPhase::Ended
    }

    /// Allocate the next entity ID.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Get an entity by ID.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get an entity mutably by ID.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// The aiming entity, if any.
    pub fn aiming_entity(&self) -> Option<&Entity> {
        self.aiming.and_then(|id| self.entities.get(&id))
    }

    /// Whether an entity exists and is Active.
    pub fn is_active(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(Entity::is_active)
    }

    /// Active entities in ID order.
    pub fn active_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.is_active())
    }

    /// Count entities in a given state.
    pub fn count_in_state(&self, state: EntityState) -> usize {
        self.entities.values().filter(|e| e.state == state).count()
    }

    /// Drop consumed entities. Returns how many were removed.
    ///
    /// Their ids are never reused, so later events naming them resolve as
    /// unknown.
    pub fn remove_consumed(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|_, entity| !entity.is_consumed());
        before - self.entities.len()
    }

    /// Centre of a new aiming fruit.
    pub fn spawn_point(&self) -> FixedVec2 {
        FixedVec2::new(self.pointer_x, self.rules.playfield.entry_y)
    }

    /// Compute hash of current state for replay verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(&self.session_id, self.rng_seed, |hasher| {
            for entity in self.entities.values() {
                hasher
                    .write(&entity.id.0)
                    .write(&entity.tier.rank())
                    .write(&entity.position)
                    .write(&(entity.state as u8));
            }

            let [s0, s1] = self.rng.state();
            hasher
                .write(&(self.phase as u8))
                .write(&self.muted)
                .write(&self.aiming.map(|id| id.0))
                .write(&self.pointer_x)
                .write(&self.next_entity_id)
                .write(&self.fusions)
                .write(&s0)
                .write(&s1);
        })
    }

    /// Append an event with the next sequence number.
    pub fn push_event(&mut self, data: GameEventData) {
        let event = GameEvent::new(self.next_event_seq, data);
        self.next_event_seq += 1;
        self.pending_events.push(event);
    }

    /// Append a collaborator command.
    pub fn push_command(&mut self, command: Command) {
        self.pending_commands.push(command);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Take pending commands (consumes them).
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending_commands)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::fixed::to_fixed;
    use crate::game::tier::TierSpec;

    /// small -> medium -> large, only `small` spawnable, overflow disabled.
    pub fn three_tier_rules() -> SessionRules {
        let catalog = TierCatalog::new(
            &[
                TierSpec::new("small", to_fixed(10.0), Some("medium")),
                TierSpec::new("medium", to_fixed(20.0), Some("large")),
                TierSpec::new("large", to_fixed(40.0), None),
            ],
            1,
        )
        .unwrap();
        SessionRules {
            catalog,
            playfield: Playfield {
                width: to_fixed(400.0),
                height: to_fixed(600.0),
                entry_y: to_fixed(20.0),
            },
            body: BodyProfile::default(),
            fusion_effect_ms: 100,
            overflow: None,
        }
    }

    /// A running three-tier session with no entities.
    pub fn running_state() -> GameState {
        let mut state = GameState::new([7; 16], 12345, three_tier_rules());
        state.phase = SessionPhase::Running;
        state
    }

    /// Insert an Active entity directly, bypassing spawn/drop.
    pub fn place_active(state: &mut GameState, tier_name: &str, x: i32, y: i32) -> EntityId {
        let tier = state.catalog().by_name(tier_name).unwrap();
        let size = state.catalog().size_of(tier);
        let body = crate::game::entity::BodyParams::for_size(state.rules.body, size);
        let id = state.allocate_id();
        state
            .entities
            .insert(id, Entity::active(id, tier, FixedVec2::from_ints(x, y), body));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_new_session_waits() {
        let state = GameState::new([0; 16], 1, three_tier_rules());
        assert_eq!(state.phase, SessionPhase::Waiting);
        assert!(state.aiming.is_none());
        assert!(!state.muted);
        assert_eq!(state.pointer_x, state.rules.playfield.width / 2);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut state = running_state();
        let a = state.allocate_id();
        let b = state.allocate_id();
        assert!(a < b);
    }

    #[test]
    fn test_hash_determinism() {
        let mut a = running_state();
        let mut b = running_state();
        place_active(&mut a, "small", 10, 10);
        place_active(&mut b, "small", 10, 10);
        assert_eq!(a.compute_hash(), b.compute_hash());

        place_active(&mut b, "medium", 30, 10);
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_event_sequence_numbers() {
        let mut state = running_state();
        state.push_event(GameEventData::SessionStarted);
        state.push_event(GameEventData::MuteToggled { muted: true });

        let events = state.take_events();
        assert_eq!(events[0].seq, 0);
        assert_eq!(events[1].seq, 1);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_remove_consumed_keeps_live_entities() {
        let mut state = running_state();
        let a = place_active(&mut state, "small", 0, 0);
        let b = place_active(&mut state, "small", 10, 0);
        let c = place_active(&mut state, "medium", 50, 0);
        state.get_mut(a).unwrap().consume();
        state.get_mut(b).unwrap().consume();

        assert_eq!(state.remove_consumed(), 2);
        assert_eq!(state.entities.keys().copied().collect::<Vec<_>>(), vec![c]);
        assert_eq!(state.remove_consumed(), 0);

        // Ids keep counting past removed entities
        assert_eq!(state.allocate_id(), EntityId(3));
    }
}
