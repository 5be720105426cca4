//! Q15 fixed-point primitives
//!
//! Q15 represents a fractional value in [-1, 1] as an integer scaled by
//! 2^15. All descaling here truncates toward zero (integer division, not an
//! arithmetic shift), so negative intermediates round exactly like the
//! 16/32-bit integer paths this core targets.

/// Q15 scale factor (2^15).
///
/// Note that +1.0 in Q15 is 32768, which only fits in a 32-bit coefficient;
/// the twiddle table stores its entries as `i32` for this reason.
pub const SCALE: i32 = 1 << 15;

/// Rotate the complex value `(re, im)` by the Q15 coefficient pair
/// `(cos, sin)`.
///
/// Returns `((re*cos - im*sin) / 2^15, (im*cos + re*sin) / 2^15)`. The
/// products are widened to 64 bits and each component is descaled once,
/// after the add/subtract, with truncation toward zero. Descaling per
/// product instead would truncate at a different point and break
/// bit-compatibility.
#[inline]
pub fn rotate(re: i32, im: i32, cos: i32, sin: i32) -> (i32, i32) {
    let (re, im, cos, sin) = (re as i64, im as i64, cos as i64, sin as i64);
    let out_re = (re * cos - im * sin) / SCALE as i64;
    let out_im = (im * cos + re * sin) / SCALE as i64;
    (out_re as i32, out_im as i32)
}

/// Halve a value with truncation toward zero.
///
/// Butterfly outputs are halved every stage to bound growth; `v / 2` (not
/// `v >> 1`) so that -3 halves to -1, matching the reference arithmetic.
#[inline]
pub fn halve(v: i32) -> i32 {
    v / 2
}
