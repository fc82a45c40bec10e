//! Game Events
//!
//! Domain facts recorded during a session, for logging and replay checks.

use serde::{Serialize, Deserialize};
use crate::core::vec2::FixedVec2;
use crate::game::entity::EntityId;
use crate::game::state::EndReason;
use crate::game::tier::TierId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Session left the start screen
    SessionStarted,

    /// New aiming fruit
    Spawned {
        entity: EntityId,
        tier: TierId,
        position: FixedVec2,
    },

    /// Aiming fruit released into physics
    Dropped {
        entity: EntityId,
        tier: TierId,
        position: FixedVec2,
    },

    /// Two fruits fused into their successor
    Fused {
        consumed: [EntityId; 2],
        from_tier: TierId,
        produced: EntityId,
        into_tier: TierId,
        position: FixedVec2,
    },

    /// Mute flag flipped
    MuteToggled { muted: bool },

    /// Session reached its terminal state
    SessionEnded { reason: EndReason },
}

/// A sequenced game event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Position in the session's event stream
    pub seq: u64,
    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(seq: u64, data: GameEventData) -> Self {
        Self { seq, data }
    }

    /// Entity the event is about, if any.
    pub fn entity(&self) -> Option<EntityId> {
        match &self.data {
            GameEventData::Spawned { entity, .. } | GameEventData::Dropped { entity, .. } => {
                Some(*entity)
            }
            GameEventData::Fused { produced, .. } => Some(*produced),
            _ => None,
        }
    }
}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.seq.cmp(&other.seq)
    }
}
