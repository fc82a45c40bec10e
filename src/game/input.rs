//! Shell Input
//!
//! Everything the surrounding game loop can deliver to the core. A frame is
//! an ordered list of these; order inside a frame is preserved all the way
//! through the resolver.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::game::contact::BodySync;
use crate::game::fusion::CollisionEvent;

/// One input delivered by the shell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Start button pressed
    Start,
    /// Mute button pressed
    ToggleMute,
    /// Shell wants the session over (window closing, quit button)
    EndRequested,
    /// Pointer moved to x
    PointerMove(Fixed),
    /// Pointer pressed: release the aiming fruit
    PointerDown,
    /// Body positions after a physics step
    BodySync(Vec<BodySync>),
    /// Touching pairs reported by one physics step
    Collisions(Vec<CollisionEvent>),
}

impl InputEvent {
    /// Player-originated input (as opposed to physics reports).
    pub fn is_player_input(&self) -> bool {
        matches!(
            self,
            InputEvent::Start
                | InputEvent::ToggleMute
                | InputEvent::EndRequested
                | InputEvent::PointerMove(_)
                | InputEvent::PointerDown
        )
    }
}

/// Frame builder for shells that collect input over a step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Inputs in delivery order
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    /// Create a new empty frame.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an input.
    pub fn push(&mut self, event: InputEvent) -> &mut Self {
        self.events.push(event);
        self
    }

    /// Check if this is an idle frame (no input).
    pub fn is_idle(&self) -> bool {
        self.events.is_empty()
    }
}

impl From<Vec<InputEvent>> for InputFrame {
    fn from(events: Vec<InputEvent>) -> Self {
        Self { events }
    }
}
