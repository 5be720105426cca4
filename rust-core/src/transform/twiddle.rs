//! Precomputed Q15 twiddle factors
//!
//! One table serves both the half-length complex FFT and the real-signal
//! recombination stage: entry `i` holds the coefficients for angle
//! `pi * i / half_len`.

use std::f64::consts::PI;

use super::{check_fft_len, TransformError};
use crate::q15;

/// Fixed-point cosine/sine coefficient table for one transform length.
///
/// Immutable after construction. Entry `i` is
/// `(cos(pi*i/half_len), -sin(pi*i/half_len))`, each scaled by 2^15 and
/// truncated to integer; the cosine of angle zero is +1.0 = 32768, which is
/// why the entries are 32-bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwiddleTable {
    /// Scaled cosine values
    wr: Vec<i32>,

    /// Scaled negated sine values
    wi: Vec<i32>,
}

impl TwiddleTable {
    /// Build the table for a real transform of `fft_len` samples.
    ///
    /// The table has `fft_len / 2` entries spanning half a turn.
    pub fn new(fft_len: usize) -> Result<Self, TransformError> {
        check_fft_len(fft_len)?;

        let half_len = fft_len / 2;
        let omega = PI / half_len as f64;

        let mut wr = Vec::with_capacity(half_len);
        let mut wi = Vec::with_capacity(half_len);
        for i in 0..half_len {
            let angle = omega * i as f64;
            wr.push((q15::SCALE as f64 * angle.cos()) as i32);
            wi.push((-(q15::SCALE as f64) * angle.sin()) as i32);
        }

        Ok(Self { wr, wi })
    }

    /// Number of entries (half the transform length)
    pub fn len(&self) -> usize {
        self.wr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wr.is_empty()
    }

    /// Coefficient pair `(cos, -sin)` at index `i`
    #[inline]
    pub fn pair(&self, i: usize) -> (i32, i32) {
        (self.wr[i], self.wi[i])
    }
}
