//! # Spectral Analysis Module
//!
//! Turns a block of time-domain samples into its dominant frequency via
//! a one-sided magnitude spectrum.
//!
//! No windowing function is applied before the transform, so spectral
//! leakage smears energy into neighbouring bins. The dominant bin is
//! still the nearest one to a pure tone, which is all a single-pitch
//! detector needs.

use crate::SpectrumResult;
use rustfft::{FftPlanner, num_complex::Complex};

/// Log-magnitude assigned to bins whose amplitude is effectively zero.
/// Keeps `log10(0)` out of the spectrum and lets silence be recognized.
pub const DB_FLOOR: f32 = -200.0;

/// Amplitudes below this are treated as zero.
const AMPLITUDE_EPSILON: f32 = 1e-10;

/// Computes one-sided magnitude spectra and extracts the dominant bin.
///
/// The planner caches FFT plans internally, so analyzing blocks of the
/// same length reuses the plan after the first call.
pub struct SpectralAnalyzer {
    sample_rate: u32,
    planner: FftPlanner<f32>,
}

impl SpectralAnalyzer {
    /// Creates an analyzer calibrated for a capture rate in Hz.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            planner: FftPlanner::new(),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frequency spacing between adjacent bins for a block of `n` samples.
    pub fn bin_width(&self, n: usize) -> f32 {
        self.sample_rate as f32 / n as f32
    }

    /// Analyzes one block and returns the dominant frequency, or `None`
    /// when there is nothing to report (empty block or silence).
    ///
    /// The spectrum is normalized by the block length, folded to its
    /// one-sided form with doubled magnitudes, stripped of the DC bin,
    /// and converted to dB. The result frequency is the center of the
    /// loudest bin, rounded to two decimals; ties go to the lowest bin.
    pub fn analyze(&mut self, block: &[f32]) -> Option<SpectrumResult> {
        let n = block.len();
        // Fewer than 4 samples leaves no non-DC bin below Nyquist.
        if n < 4 {
            return None;
        }

        let fft = self.planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex<f32>> = block
            .iter()
            .map(|&sample| Complex::new(sample, 0.0))
            .collect();
        fft.process(&mut buffer);

        // One-sided spectrum: bins 1..N/2, normalized by N and doubled
        // to fold in the energy of the symmetric negative half. Bin 0
        // (DC offset) is never a valid pitch and is discarded.
        let magnitudes_db: Vec<f32> = buffer[1..n / 2]
            .iter()
            .map(|c| {
                let amplitude = 2.0 * c.norm() / n as f32;
                if amplitude > AMPLITUDE_EPSILON {
                    20.0 * amplitude.log10()
                } else {
                    DB_FLOOR
                }
            })
            .collect();

        // Strictly-greater comparison makes the lowest index win ties.
        let (peak_index, peak_db) = magnitudes_db
            .iter()
            .copied()
            .enumerate()
            .fold((0, DB_FLOOR), |best, (i, db)| {
                if db > best.1 { (i, db) } else { best }
            });

        // Every bin on the floor means silence, not a pitch.
        if peak_db <= DB_FLOOR {
            return None;
        }

        let raw_frequency = (peak_index + 1) as f32 * self.bin_width(n);
        let frequency = (raw_frequency * 100.0).round() / 100.0;

        Some(SpectrumResult {
            frequency,
            magnitudes_db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency: f32, sample_rate: u32, n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    /// Deterministic pseudo-random noise, no RNG dependency needed.
    fn noise(n: usize) -> Vec<f32> {
        let mut state: u32 = 0x2545_f491;
        (0..n)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect()
    }

    #[test]
    fn a4_sine_is_detected_within_one_bin_width() {
        let mut analyzer = SpectralAnalyzer::new(96000);
        let block = sine(440.0, 96000, 10240);

        let result = analyzer.analyze(&block).expect("sine must produce a peak");
        let bin_width = analyzer.bin_width(10240); // 9.375 Hz

        assert!(
            (result.frequency - 440.0).abs() <= bin_width,
            "expected 440 +/- {bin_width}, got {}",
            result.frequency
        );
    }

    #[test]
    fn bin_aligned_sine_is_detected_exactly() {
        // 440 Hz falls exactly on bin 44 at 48 kHz with 4800 samples.
        let mut analyzer = SpectralAnalyzer::new(48000);
        let block = sine(440.0, 48000, 4800);

        let result = analyzer.analyze(&block).unwrap();
        assert_eq!(result.frequency, 440.0);
    }

    #[test]
    fn frequency_is_rounded_to_two_decimals() {
        // Bin 10 at 44.1 kHz / 1024 samples sits at 430.6640625 Hz.
        let mut analyzer = SpectralAnalyzer::new(44100);
        let bin_width = analyzer.bin_width(1024);
        let block = sine(10.0 * bin_width, 44100, 1024);

        let result = analyzer.analyze(&block).unwrap();
        assert_eq!(result.frequency, 430.66);
    }

    #[test]
    fn silence_returns_none_without_panicking() {
        let mut analyzer = SpectralAnalyzer::new(44100);
        for n in [4, 64, 1024, 10240] {
            assert!(analyzer.analyze(&vec![0.0; n]).is_none());
        }
    }

    #[test]
    fn empty_and_degenerate_blocks_return_none() {
        let mut analyzer = SpectralAnalyzer::new(44100);
        assert!(analyzer.analyze(&[]).is_none());
        assert!(analyzer.analyze(&[0.3]).is_none());
        assert!(analyzer.analyze(&[0.3, -0.3]).is_none());
    }

    #[test]
    fn dc_only_block_returns_none() {
        // A constant offset has all its energy in the discarded DC bin.
        let mut analyzer = SpectralAnalyzer::new(48000);
        assert!(analyzer.analyze(&vec![1.0; 2048]).is_none());
    }

    #[test]
    fn detected_frequency_stays_inside_the_valid_band() {
        let mut analyzer = SpectralAnalyzer::new(44100);
        let n = 2048;
        let block = noise(n);

        let result = analyzer.analyze(&block).unwrap();
        let bin_width = analyzer.bin_width(n);

        assert!(result.frequency >= bin_width);
        assert!(result.frequency < 44100.0 / 2.0);
        assert!(result.frequency.is_finite());
    }

    #[test]
    fn spectrum_length_is_half_the_block_minus_dc() {
        let mut analyzer = SpectralAnalyzer::new(48000);
        let block = sine(1000.0, 48000, 2048);

        let result = analyzer.analyze(&block).unwrap();
        assert_eq!(result.magnitudes_db.len(), 2048 / 2 - 1);
        assert!(result.magnitudes_db.iter().all(|db| db.is_finite()));
    }
}
