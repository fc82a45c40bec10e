//! World Digest
//!
//! SHA-256 over the playfield, used to check that a replayed session
//! reached exactly the same world as the live one. Values are fed in a fixed
//! little-endian encoding through [`HashInput`]; feed order is part of the
//! digest.

use sha2::{Sha256, Digest};
use super::vec2::FixedVec2;

/// 32-byte world digest.
pub type StateHash = [u8; 32];

/// Domain tag for session digests.
const SESSION_DOMAIN: &[u8] = b"FRUIT_FUSION_STATE_V1";

/// A value with a canonical byte encoding for the digest.
pub trait HashInput {
    /// Feed the encoding into a SHA-256 state.
    fn feed(&self, sha: &mut Sha256);
}

macro_rules! le_hash_input {
    ($($ty:ty),*) => {
        $(impl HashInput for $ty {
            #[inline]
            fn feed(&self, sha: &mut Sha256) {
                sha.update(self.to_le_bytes());
            }
        })*
    };
}

// Fixed is i32, so it is covered here
le_hash_input!(u8, u32, u64, i32);

impl HashInput for bool {
    #[inline]
    fn feed(&self, sha: &mut Sha256) {
        sha.update([*self as u8]);
    }
}

impl HashInput for FixedVec2 {
    #[inline]
    fn feed(&self, sha: &mut Sha256) {
        self.x.feed(sha);
        self.y.feed(sha);
    }
}

impl HashInput for [u8] {
    #[inline]
    fn feed(&self, sha: &mut Sha256) {
        sha.update(self);
    }
}

impl<T: HashInput> HashInput for Option<T> {
    fn feed(&self, sha: &mut Sha256) {
        match self {
            None => sha.update([0u8]),
            Some(value) => {
                sha.update([1u8]);
                value.feed(sha);
            }
        }
    }
}

/// Incremental digest builder.
pub struct StateHasher {
    sha: Sha256,
}

impl StateHasher {
    /// Start a digest under a domain tag.
    pub fn new(domain: &[u8]) -> Self {
        let mut sha = Sha256::new();
        sha.update(domain);
        Self { sha }
    }

    /// Feed one value.
    #[inline]
    pub fn write<T: HashInput + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.feed(&mut self.sha);
        self
    }

    /// Finish the digest.
    pub fn finalize(self) -> StateHash {
        self.sha.finalize().into()
    }
}

/// Digest a session: identity and seed first, then whatever `add_state`
/// feeds.
pub fn compute_state_hash<F>(session_id: &[u8; 16], rng_seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::new(SESSION_DOMAIN);
    hasher.write(&session_id[..]).write(&rng_seed);
    add_state(&mut hasher);
    hasher.finalize()
}
