//! Q16.16 Fixed-Point Arithmetic
//!
//! Playfield coordinates and fruit sizes are stored as Q16.16 so a session
//! replays bit-for-bit from its seed and input log.
//!
//! ```text
//! [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]
//!     16 integer bits   16 fraction bits
//! ```
//!
//! Range is roughly ±32768 units, plenty for a portrait playfield measured
//! in pixels.

/// Q16.16 fixed-point number stored as i32.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE;

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1;

/// Convert a float to fixed-point.
///
/// Used at configuration time only; gameplay never touches floats.
///
/// # Example
/// ```
/// use fruit_fusion::core::fixed::{to_fixed, FIXED_ONE};
/// const SIZE: i32 = to_fixed(2.5);
/// assert_eq!(SIZE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert fixed-point to float for display and logging.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Halve a fixed-point value (floor toward negative infinity).
#[inline]
pub fn fixed_half(a: Fixed) -> Fixed {
    a >> 1
}

/// Arithmetic mean of two fixed-point values without overflow.
#[inline]
pub fn fixed_mean(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 + b as i64) >> 1) as Fixed
}

/// Clamp a fixed-point number to a range.
#[inline]
pub fn fixed_clamp(value: Fixed, min: Fixed, max: Fixed) -> Fixed {
    value.max(min).min(max)
}
