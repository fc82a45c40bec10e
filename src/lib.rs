//! # Fruit Fusion
//!
//! Deterministic merge core for a falling-fruit fusion game: spawn a fruit,
//! aim it, drop it, and fuse equal fruits into the next tier until two
//! top-tier fruits meet.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       FRUIT FUSION                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - 2D vector with fixed-point                │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Session logic (deterministic)             │
//! │  ├── tier.rs     - Tier catalog and successor chain          │
//! │  ├── spawn.rs    - Spawn controller                          │
//! │  ├── release.rs  - Pointer tracking and drops                │
//! │  ├── fusion.rs   - Collision-to-fusion resolver              │
//! │  ├── session.rs  - Start, mute, termination                  │
//! │  └── tick.rs     - Frame driver and replay                   │
//! │                                                              │
//! │  config.rs       - JSON/env configuration (non-deterministic)│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering, audio and physics live outside the crate. The core tells them
//! what to do through [`game::Command`]s and learns what they did through
//! [`game::InputEvent`]s.
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in game logic
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Given identical rules, seed and input frames, a session produces
//! **identical events, commands and state hash**.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::rng::DeterministicRng;
pub use config::{GameConfig, ConfigError};
pub use game::input::{InputEvent, InputFrame};
pub use game::state::{GameState, SessionRules, EndReason};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
