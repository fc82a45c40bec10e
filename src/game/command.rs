//! Collaborator Commands
//!
//! Requests from the core to the physics, presentation and audio
//! collaborators. The core appends them to an outbox and never waits on
//! them; the shell drains the outbox after each step and executes them in
//! order.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::game::entity::{BodyParams, EntityId};
use crate::game::state::EndReason;
use crate::game::tier::TierId;

/// Short one-shot sounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    /// Fruit released
    Click,
    /// Two fruits fused
    Pop,
}

/// A request to an external collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Show a fruit sprite for an entity.
    CreateVisual {
        entity: EntityId,
        tier: TierId,
        position: FixedVec2,
        size: Fixed,
    },

    /// Move an aiming fruit's sprite to follow the pointer.
    MoveVisual { entity: EntityId, position: FixedVec2 },

    /// Remove an entity's sprite.
    DestroyVisual { entity: EntityId },

    /// Give an entity a rigid body and add it to the shared fruit
    /// collision group.
    AttachBody { entity: EntityId, params: BodyParams },

    /// Remove an entity's rigid body.
    DetachBody { entity: EntityId },

    /// Ephemeral fusion flash; the presentation layer destroys it on its
    /// own after `duration_ms`.
    SpawnEffect {
        position: FixedVec2,
        size: Fixed,
        duration_ms: u32,
    },

    /// Play a one-shot sound.
    PlaySound(Sound),

    /// Start looping background music.
    StartMusic,

    /// Pause background music (mute on).
    PauseMusic,

    /// Resume background music (mute off).
    ResumeMusic,

    /// Session is over; show the end screen.
    ShowEndScreen { reason: EndReason },
}

impl Command {
    /// Entity the command targets, if any.
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            Command::CreateVisual { entity, .. }
            | Command::MoveVisual { entity, .. }
            | Command::DestroyVisual { entity }
            | Command::AttachBody { entity, .. }
            | Command::DetachBody { entity } => Some(*entity),
            _ => None,
        }
    }
}
