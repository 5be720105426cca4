//! Q15 Spectrum Core - Fixed-Point Spectral Analysis
//!
//! Power-spectrum engine for real-valued signals on integer-only hardware:
//! a radix-2 decimation-in-time FFT over Q15 fixed-point buffers, a
//! real-input optimization running at half the transform length, and
//! per-bin / per-band power aggregation with saturation diagnostics.

pub mod diag;
pub mod q15;
pub mod spectrum;
pub mod transform;

pub use diag::{DiagnosticSink, OverflowEvent, StderrSink};
pub use spectrum::{compute_band_power, compute_power_spectrum, AnalyzerConfig, PowerSpectrumAnalyzer};
pub use transform::{RealFftEngine, TransformError, TwiddleTable};
