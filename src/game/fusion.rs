//! Fusion Resolver
//!
//! Turns reported collisions into fusions. Every pair goes through the same
//! three gates in order: staleness, tier match, successor lookup. The
//! staleness gate is what keeps an entity from being fused twice when one
//! physics step reports it against several neighbours.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::game::command::{Command, Sound};
use crate::game::entity::{BodyParams, Entity, EntityId};
use crate::game::events::GameEventData;
use crate::game::session::end_session;
use crate::game::state::{EndReason, GameState};
use crate::game::tier::TierId;

/// Two bodies reported touching. Unordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// First body
    pub a: EntityId,
    /// Second body
    pub b: EntityId,
}

impl CollisionEvent {
    /// Pair two bodies.
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }
}

/// What the resolver did with one collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FusionOutcome {
    /// Both inputs consumed, one successor created.
    Fused {
        consumed: [EntityId; 2],
        produced: EntityId,
        into_tier: TierId,
    },
    /// Two top-tier fruits met; the session ended.
    TopTierReached { tier: TierId },
    /// One side is unknown, not Active, or the pair is degenerate.
    Stale,
    /// Different tiers just bounce.
    TierMismatch,
    /// Session is not running.
    Inactive,
}

impl FusionOutcome {
    /// Whether the collision changed the world.
    pub fn is_fusion(&self) -> bool {
        matches!(self, FusionOutcome::Fused { .. })
    }
}

/// Resolve one collision.
pub fn resolve_collision(state: &mut GameState, event: CollisionEvent) -> FusionOutcome {
    if !state.is_running() {
        return FusionOutcome::Inactive;
    }

    let CollisionEvent { a, b } = event;
    if a == b {
        return FusionOutcome::Stale;
    }

    let (tier_a, tier_b, midpoint) = match (state.get(a), state.get(b)) {
        (Some(ea), Some(eb)) if ea.is_active() && eb.is_active() => {
            (ea.tier, eb.tier, ea.position.midpoint(eb.position))
        }
        _ => return FusionOutcome::Stale,
    };

    if tier_a != tier_b {
        return FusionOutcome::TierMismatch;
    }

    let Some(next) = state.catalog().successor_of(tier_a) else {
        debug!("top tier {} collision between {} and {}", tier_a, a, b);
        end_session(state, EndReason::TopTierCollision { tier: tier_a });
        return FusionOutcome::TopTierReached { tier: tier_a };
    };

    for id in [a, b] {
        if let Some(entity) = state.get_mut(id) {
            entity.consume();
        }
        state.push_command(Command::DetachBody { entity: id });
        state.push_command(Command::DestroyVisual { entity: id });
    }

    let size = state.catalog().size_of(next);
    let params = BodyParams::for_size(state.rules.body, size);
    let produced = state.allocate_id();
    state
        .entities
        .insert(produced, Entity::active(produced, next, midpoint, params));
    state.fusions += 1;

    debug!(
        "fused {} + {} ({}) -> {} ({}) at {}",
        a,
        b,
        state.catalog().name_of(tier_a),
        produced,
        state.catalog().name_of(next),
        midpoint
    );

    state.push_command(Command::CreateVisual {
        entity: produced,
        tier: next,
        position: midpoint,
        size,
    });
    state.push_command(Command::AttachBody { entity: produced, params });
    state.push_command(Command::PlaySound(Sound::Pop));
    state.push_command(Command::SpawnEffect {
        position: midpoint,
        size,
        duration_ms: state.rules.fusion_effect_ms,
    });
    state.push_event(GameEventData::Fused {
        consumed: [a, b],
        from_tier: tier_a,
        produced,
        into_tier: next,
        position: midpoint,
    });

    FusionOutcome::Fused {
        consumed: [a, b],
        produced,
        into_tier: next,
    }
}

/// Resolve a batch of collisions in delivery order.
pub fn resolve_batch(state: &mut GameState, batch: &[CollisionEvent]) -> Vec<FusionOutcome> {
    batch
        .iter()
        .map(|event| resolve_collision(state, *event))
        .collect()
}
