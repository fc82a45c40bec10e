//! Game Logic Module
//!
//! The tier/fusion state machine. 100% deterministic given a seed and an
//! input log.
//!
//! ## Module Structure
//!
//! - `tier`: Tier catalog and its validation
//! - `entity`: Entities, lifecycle states, body parameters
//! - `state`: Session state, rules, outboxes
//! - `spawn`: Spawn controller
//! - `release`: Pointer tracking and the drop controller
//! - `fusion`: Collision-to-fusion resolver
//! - `session`: Start, mute, termination, overflow watchdog
//! - `contact`: Physics position sync and contact scan
//! - `input`: Shell input events and frames
//! - `tick`: Frame driver and replay
//! - `events` / `command`: What happened, and what collaborators must do

pub mod tier;
pub mod entity;
pub mod state;
pub mod events;
pub mod command;
pub mod spawn;
pub mod release;
pub mod fusion;
pub mod session;
pub mod contact;
pub mod input;
pub mod tick;

pub use tier::{TierCatalog, TierId, TierSpec, CatalogError};
pub use entity::{Entity, EntityId, EntityState, BodyParams, BodyProfile};
pub use state::{GameState, SessionPhase, SessionRules, EndReason, Playfield, OverflowRule};
pub use events::{GameEvent, GameEventData};
pub use command::{Command, Sound};
pub use spawn::{spawn_next, SpawnOutcome};
pub use release::{move_pointer, release_aiming, ReleaseOutcome};
pub use fusion::{resolve_collision, resolve_batch, CollisionEvent, FusionOutcome};
pub use session::{start_session, toggle_mute, end_session, check_overflow};
pub use contact::{BodySync, find_contacts, sync_bodies};
pub use input::{InputEvent, InputFrame};
pub use tick::{tick, replay_session, TickResult};
