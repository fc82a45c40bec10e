//! Core deterministic primitives.
//!
//! Fixed-point numbers, vectors, the seeded RNG and state hashing. Nothing
//! here knows about fruits.

pub mod fixed;
pub mod vec2;
pub mod rng;
pub mod hash;

pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use vec2::FixedVec2;
pub use rng::DeterministicRng;
pub use hash::{HashInput, StateHash, StateHasher, compute_state_hash};
