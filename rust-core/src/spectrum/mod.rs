//! Spectral aggregation over the fixed-point transform

pub mod analysis;
pub mod bands;
pub mod power;

pub use analysis::{AnalyzerConfig, PowerSpectrumAnalyzer};
pub use bands::compute_band_power;
pub use power::compute_power_spectrum;
