//! Fixed-point Fourier transform

use thiserror::Error;

pub mod fft;
pub mod real;
pub mod twiddle;

pub use fft::{even_stage_count, fft_in_place};
pub use real::RealFftEngine;
pub use twiddle::TwiddleTable;

/// Largest supported transform length.
///
/// Bin indices and packed spectrum halves travel as 16-bit integers, so the
/// length must stay within the i16 range.
pub const MAX_FFT_LEN: usize = 1 << 15;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformError {
    #[error("FFT length must be a power of two in [4, {MAX_FFT_LEN}] (got {0})")]
    InvalidFftLength(usize),

    #[error("buffer holds {found} samples but the transform is configured for {expected}")]
    BufferLength { expected: usize, found: usize },

    #[error("band count {bands} does not evenly divide the spectrum length {len}")]
    BandLayout { bands: usize, len: usize },
}

/// Validate a transform length: power of two, at least 4 (the real-signal
/// recombination needs a quarter length), at most [`MAX_FFT_LEN`].
pub(crate) fn check_fft_len(fft_len: usize) -> Result<(), TransformError> {
    if fft_len < 4 || fft_len > MAX_FFT_LEN || !fft_len.is_power_of_two() {
        return Err(TransformError::InvalidFftLength(fft_len));
    }
    Ok(())
}
