//! Per-bin power spectrum
//!
//! Converts a packed complex spectrum (real halves then imaginary halves of
//! one buffer, as produced by `RealFftEngine::process`) into per-bin power
//! magnitudes with gain scaling and saturation.

use crate::diag::{DiagnosticSink, OverflowEvent};

/// Maximum representable power magnitude (i16 positive range)
const MAX_POWER: i64 = 32767;

/// Compute the power spectrum in place.
///
/// `spectrum` holds `len = spectrum.len() / 2` bins: real parts in
/// `[0, len)`, imaginary parts in `[len, 2*len)`. Each bin i in `[1, len)`
/// becomes `floor(sqrt(re^2 + im^2)) >> gain` (gains above 63 behave as
/// 63, zeroing every bin), saturated to 32767 with an
/// [`OverflowEvent::PowerBin`] through `sink` when it exceeds that. Bin 0
/// (DC) is always zeroed before the pass; `remove_dc` re-zeroes it for
/// explicitness, so the net effect does not depend on the flag. Only the
/// first `len` entries are meaningful afterwards.
pub fn compute_power_spectrum(
    spectrum: &mut [i16],
    gain: u32,
    remove_dc: bool,
    sink: &mut dyn DiagnosticSink,
) {
    let len = spectrum.len() / 2;
    if len == 0 {
        return;
    }

    // The base frequency carries no band information
    spectrum[0] = 0;

    // Bin i reads indices i and i + len, neither touched by the writes to
    // earlier bins, so no scratch copy is needed
    for i in 1..len {
        let re = spectrum[i] as i64;
        let im = spectrum[i + len] as i64;

        let mut power = ((re * re + im * im) as f64).sqrt() as i64;
        // Shifting an i64 by 64+ is an arithmetic overflow; 63 already
        // clears any magnitude
        power >>= gain.min(63);
        if power > MAX_POWER {
            sink.record(OverflowEvent::PowerBin {
                bin: i,
                re: re as i32,
                im: im as i32,
                magnitude: power,
            });
            power = MAX_POWER;
        }

        spectrum[i] = power as i16;
    }

    if remove_dc {
        spectrum[0] = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::OverflowEvent;

    fn run(spectrum: &mut [i16], gain: u32, remove_dc: bool) -> Vec<OverflowEvent> {
        let mut events: Vec<OverflowEvent> = Vec::new();
        compute_power_spectrum(spectrum, gain, remove_dc, &mut events);
        events
    }

    #[test]
    fn test_magnitude_is_floor_of_sqrt() {
        // bins: re = [9, 3, 0, 5], im = [0, 4, -2, 5]
        let mut spectrum = vec![9, 3, 0, 5, 0, 4, -2, 5];
        let events = run(&mut spectrum, 0, false);

        assert!(events.is_empty());
        // bin 0 zeroed, |3+4j| = 5, |0-2j| = 2, |5+5j| = floor(7.07..) = 7
        assert_eq!(&spectrum[..4], &[0, 5, 2, 7]);
    }

    #[test]
    fn test_gain_shifts_magnitude_down() {
        let mut spectrum = vec![0, 1000, 0, 0, 0, 0, 0, 0];
        run(&mut spectrum, 3, false);
        assert_eq!(spectrum[1], 125);
    }

    #[test]
    fn test_dc_bin_always_zeroed() {
        for remove_dc in [false, true] {
            let mut spectrum = vec![30000, 10, 0, 0, 100, 0, 0, 0];
            run(&mut spectrum, 0, remove_dc);
            assert_eq!(spectrum[0], 0, "remove_dc = {}", remove_dc);
        }
    }

    #[test]
    fn test_overflow_clamps_and_reports() {
        // |30000 + 30000j| = 42426 > 32767
        let mut spectrum = vec![0, 30000, 0, 0, 0, 30000, 0, 0];
        let events = run(&mut spectrum, 0, true);

        assert_eq!(spectrum[1], 32767);
        assert_eq!(
            events,
            vec![OverflowEvent::PowerBin { bin: 1, re: 30000, im: 30000, magnitude: 42426 }]
        );
    }

    #[test]
    fn test_gain_can_avert_overflow() {
        let mut spectrum = vec![0, 30000, 0, 0, 0, 30000, 0, 0];
        let events = run(&mut spectrum, 1, true);

        assert_eq!(spectrum[1], 21213);
        assert!(events.is_empty());
    }

    #[test]
    fn test_oversized_gain_zeroes_bins() {
        // A gain at or beyond the i64 width must zero, not panic
        let mut spectrum = vec![0, 30000, 0, 0, 0, 30000, 0, 0];
        let events = run(&mut spectrum, 64, false);

        assert_eq!(&spectrum[..4], &[0, 0, 0, 0]);
        assert!(events.is_empty());
    }

    #[test]
    fn test_negative_components() {
        let mut spectrum = vec![0, -3, 0, 0, 0, -4, 0, 0];
        run(&mut spectrum, 0, false);
        assert_eq!(spectrum[1], 5);
    }
}
