//! Overflow diagnostics
//!
//! Saturation in the power and band stages is never fatal: the value is
//! clamped and an event describing the offending bin or band is routed
//! through an injectable sink, decoupling the core from any particular
//! output. The default sink writes to stderr.

/// A saturation event raised by the spectrum stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowEvent {
    /// A power-spectrum bin exceeded the i16 maximum after gain scaling.
    PowerBin {
        /// Offending bin index
        bin: usize,
        /// Raw real component of the bin
        re: i32,
        /// Raw imaginary component of the bin
        im: i32,
        /// Magnitude after gain scaling, before clamping
        magnitude: i64,
    },

    /// A band power sum exceeded the u16 maximum after scaling.
    Band {
        /// Offending band index
        band: usize,
        /// Scaled sum before clamping
        sum: i64,
    },
}

/// Receiver for overflow events.
///
/// Emission is synchronous and must not block; processing continues for the
/// remaining bins or bands after every event.
pub trait DiagnosticSink {
    /// Record one saturation event
    fn record(&mut self, event: OverflowEvent);
}

/// A plain `Vec` collects events, which is all tests usually need.
impl DiagnosticSink for Vec<OverflowEvent> {
    fn record(&mut self, event: OverflowEvent) {
        self.push(event)
    }
}

/// Default sink: warn on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn record(&mut self, event: OverflowEvent) {
        match event {
            OverflowEvent::PowerBin { bin, re, im, magnitude } => {
                eprintln!(
                    "Spectrum power overflow: bin {} (re = {}, im = {}, magnitude = {})",
                    bin, re, im, magnitude
                );
            }
            OverflowEvent::Band { band, sum } => {
                eprintln!("Band power overflow: band {} (sum = {})", band, sum);
            }
        }
    }
}
