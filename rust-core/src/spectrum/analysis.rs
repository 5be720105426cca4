//! High-level power spectrum analyzer
//!
//! Combines the real-signal transform with the power and band stages for
//! callers that just want per-bin or per-band power out of raw samples.

use std::fmt;

use super::bands::compute_band_power;
use super::power::compute_power_spectrum;
use crate::diag::{DiagnosticSink, StderrSink};
use crate::transform::{RealFftEngine, TransformError};

/// Analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Transform length (power of two)
    pub fft_len: usize,

    /// Right shift applied to every power magnitude
    pub gain: u32,

    /// Zero the DC bin of the power spectrum
    pub remove_dc: bool,

    /// Number of aggregated frequency bands; must evenly divide
    /// `fft_len / 2`
    pub band_count: usize,

    /// Right shift applied to every band sum
    pub band_scale: u32,

    /// Sample rate in Hz, used only for the frequency axis helpers
    pub sample_rate: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_len: 256,
            gain: 0,
            remove_dc: true,
            band_count: 8,
            band_scale: 0,
            sample_rate: 48000.0,
        }
    }
}

/// Fixed-point spectrum analyzer
pub struct PowerSpectrumAnalyzer {
    config: AnalyzerConfig,
    engine: RealFftEngine,
    sink: Box<dyn DiagnosticSink>,
}

// Manual impl: the sink trait object has no Debug bound
impl fmt::Debug for PowerSpectrumAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerSpectrumAnalyzer")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl PowerSpectrumAnalyzer {
    /// Create an analyzer with the default stderr diagnostics sink.
    ///
    /// # Errors
    /// `TransformError::InvalidFftLength` for a bad `fft_len`;
    /// `TransformError::BandLayout` when `band_count` does not evenly
    /// divide the bin count.
    pub fn new(config: AnalyzerConfig) -> Result<Self, TransformError> {
        Self::with_sink(config, Box::new(StderrSink))
    }

    /// Create an analyzer routing overflow diagnostics into `sink`
    pub fn with_sink(
        config: AnalyzerConfig,
        sink: Box<dyn DiagnosticSink>,
    ) -> Result<Self, TransformError> {
        let engine = RealFftEngine::new(config.fft_len)?;
        let bins = engine.num_bins();
        if config.band_count == 0 || bins % config.band_count != 0 {
            return Err(TransformError::BandLayout { bands: config.band_count, len: bins });
        }

        Ok(Self { config, engine, sink })
    }

    /// Compute the per-bin power spectrum of one signal buffer.
    ///
    /// # Arguments
    /// * `samples` - exactly `fft_len` time-domain samples
    ///
    /// # Returns
    /// `fft_len / 2` power magnitudes, DC bin first
    pub fn power_spectrum(&mut self, samples: &[i16]) -> Result<Vec<i16>, TransformError> {
        let mut buf = samples.to_vec();
        self.engine.process(&mut buf)?;
        compute_power_spectrum(
            &mut buf,
            self.config.gain,
            self.config.remove_dc,
            self.sink.as_mut(),
        );

        buf.truncate(self.engine.num_bins());
        Ok(buf)
    }

    /// Compute per-band power of one signal buffer.
    ///
    /// # Returns
    /// `band_count` aggregated band powers
    pub fn band_power(&mut self, samples: &[i16]) -> Result<Vec<u16>, TransformError> {
        let power = self.power_spectrum(samples)?;

        // Power magnitudes are non-negative, so the u16 cast is lossless
        let mut bands: Vec<u16> = power.iter().map(|&v| v as u16).collect();
        compute_band_power(
            &mut bands,
            self.config.band_count,
            self.config.band_scale,
            self.sink.as_mut(),
        )?;

        bands.truncate(self.config.band_count);
        Ok(bands)
    }

    /// Number of frequency bins (fft_len / 2)
    pub fn num_bins(&self) -> usize {
        self.engine.num_bins()
    }

    /// Center frequency of a bin in Hz
    pub fn bin_to_hz(&self, bin: usize) -> f64 {
        bin as f64 * self.config.sample_rate / self.config.fft_len as f64
    }

    /// Frequency axis in Hz, one entry per bin
    pub fn frequency_bins_hz(&self) -> Vec<f64> {
        (0..self.num_bins()).map(|bin| self.bin_to_hz(bin)).collect()
    }

    /// Current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}
