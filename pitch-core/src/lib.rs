// pitch-core/src/lib.rs

//! The core logic for the real-time pitch detector.
//! This crate is responsible for audio capture, the producer/consumer
//! hand-off queue, and the spectral analysis that turns a block of
//! samples into a dominant frequency. It is completely headless
//! and contains no terminal or display code.

pub mod audio;
pub mod config;
pub mod driver;
pub mod queue;
pub mod spectrum;
pub mod tuning;

/// Represents the result of analyzing a single audio block.
#[derive(Debug, Clone)]
pub struct SpectrumResult {
    /// Frequency of the dominant bin in Hz, rounded to two decimals.
    /// Always lies in `[sample_rate / N, sample_rate / 2)` for a block
    /// of N samples.
    pub frequency: f32,
    /// One-sided log-magnitude spectrum in dB, DC bin excluded.
    /// Entry k corresponds to frequency `(k + 1) * sample_rate / N`.
    pub magnitudes_db: Vec<f32>,
}
