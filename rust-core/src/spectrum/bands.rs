//! Band power aggregation
//!
//! Sums contiguous runs of power-spectrum bins into coarser frequency
//! bands, with a scale shift to keep the sums in the u16 range.

use crate::diag::{DiagnosticSink, OverflowEvent};
use crate::transform::TransformError;

/// Maximum representable band power
const MAX_BAND_POWER: i64 = 0xFFFF;

/// Aggregate the power spectrum into `band_count` equal bands, in place.
///
/// Band b sums the `spectrum.len() / band_count` consecutive bins starting
/// at `b * lines_per_band`, shifted right by `scale` (scales above 63
/// behave as 63, zeroing every band); sums above 0xFFFF
/// saturate and emit an [`OverflowEvent::Band`] through `sink`. The first
/// `band_count` entries hold the result afterwards.
///
/// # Errors
/// `TransformError::BandLayout` unless `band_count` is nonzero and evenly
/// divides the spectrum length, so that every bin lands in a band.
pub fn compute_band_power(
    spectrum: &mut [u16],
    band_count: usize,
    scale: u32,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), TransformError> {
    let len = spectrum.len();
    if band_count == 0 || len % band_count != 0 {
        return Err(TransformError::BandLayout { bands: band_count, len });
    }

    let lines_per_band = len / band_count;
    for band in 0..band_count {
        let start = band * lines_per_band;
        let mut sum: i64 = spectrum[start..start + lines_per_band]
            .iter()
            .map(|&v| v as i64)
            .sum();

        // Shifting an i64 by 64+ is an arithmetic overflow; 63 already
        // clears any sum
        sum >>= scale.min(63);
        if sum > MAX_BAND_POWER {
            sink.record(OverflowEvent::Band { band, sum });
            sum = MAX_BAND_POWER;
        }

        spectrum[band] = sum as u16;
    }

    Ok(())
}
