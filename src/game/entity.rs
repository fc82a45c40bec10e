//! Entities and physics body parameters.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, FIXED_HALF, fixed_half};
use crate::core::vec2::FixedVec2;
use crate::game::tier::TierId;

// =============================================================================
// ENTITY ID
// =============================================================================

/// Monotonic entity identity. Never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Entity lifecycle state.
///
/// Transitions only go forward: Aiming -> Active -> Consumed, or straight to
/// Active for fusion products.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityState {
    /// Player-controlled, follows the pointer, no body
    Aiming = 0,
    /// Under physics simulation
    Active = 1,
    /// Fused away; must never be referenced again
    Consumed = 2,
}

// =============================================================================
// BODY PARAMETERS
// =============================================================================

/// Game-wide rigid body settings shared by every fruit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyProfile {
    /// Restitution (bounce) coefficient
    pub bounce: Fixed,
    /// Linear drag
    pub drag: Fixed,
    /// Angular drag
    pub angular_drag: Fixed,
    /// Surface friction
    pub friction: Fixed,
    /// Keep bodies inside the playfield bounds
    pub collide_world_bounds: bool,
}

impl Default for BodyProfile {
    fn default() -> Self {
        Self {
            bounce: FIXED_HALF,
            drag: 0,
            angular_drag: 0,
            friction: 0,
            collide_world_bounds: true,
        }
    }
}

/// Parameters of one attach-body request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyParams {
    /// Shared profile
    pub profile: BodyProfile,
    /// Circle collider radius (half the display size)
    pub radius: Fixed,
}

impl BodyParams {
    /// Circular body for a fruit of the given display size.
    pub fn for_size(profile: BodyProfile, size: Fixed) -> Self {
        Self {
            profile,
            radius: fixed_half(size),
        }
    }
}

// =============================================================================
// ENTITY
// =============================================================================

/// One fruit in the playfield.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Identity
    pub id: EntityId,
    /// Tier (fruit kind)
    pub tier: TierId,
    /// Last known centre position
    pub position: FixedVec2,
    /// Lifecycle state
    pub state: EntityState,
    /// Body attached while Active
    pub body: Option<BodyParams>,
    /// Position syncs received since the entity became Active
    pub active_steps: u32,
}

impl Entity {
    /// A new player-controlled entity.
    pub fn aiming(id: EntityId, tier: TierId, position: FixedVec2) -> Self {
        Self {
            id,
            tier,
            position,
            state: EntityState::Aiming,
            body: None,
            active_steps: 0,
        }
    }

    /// A new entity that starts under physics (fusion product).
    pub fn active(id: EntityId, tier: TierId, position: FixedVec2, body: BodyParams) -> Self {
        Self {
            id,
            tier,
            position,
            state: EntityState::Active,
            body: Some(body),
            active_steps: 0,
        }
    }

    /// Under player control, no body.
    #[inline]
    pub fn is_aiming(&self) -> bool {
        self.state == EntityState::Aiming
    }

    /// In the physics world.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == EntityState::Active
    }

    /// Fused away.
    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.state == EntityState::Consumed
    }

    /// Aiming -> Active with a body.
    pub fn activate(&mut self, body: BodyParams) {
        debug_assert!(self.is_aiming(), "only aiming entities are dropped");
        self.state = EntityState::Active;
        self.body = Some(body);
        self.active_steps = 0;
    }

    /// Active -> Consumed, releasing the body.
    pub fn consume(&mut self) {
        debug_assert!(self.is_active(), "only active entities are fused");
        self.state = EntityState::Consumed;
        self.body = None;
    }
}
