//! # Configuration Module
//!
//! Immutable startup configuration for the capture pipeline: sample rate,
//! block size, and input device selection. Constructed once and held for
//! the process lifetime.

/// Sample rates the analyzer is calibrated for. A request outside this
/// set falls back to [`FALLBACK_SAMPLE_RATE`] instead of failing.
pub const SUPPORTED_SAMPLE_RATES: [u32; 4] = [44100, 48000, 96000, 192000];

/// Rate used when an unsupported one is requested.
pub const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// Default capture rate, chosen for fine frequency resolution.
pub const DEFAULT_SAMPLE_RATE: u32 = 96000;

/// Default number of frames per analysis block.
///
/// At 96 kHz this gives a bin width of 96000 / 10240 = 9.375 Hz,
/// enough to separate adjacent notes above roughly A2.
pub const DEFAULT_CHUNK_SIZE: usize = 10240;

/// Immutable device and analysis configuration chosen at startup.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Requested capture rate in Hz. Always one of
    /// [`SUPPORTED_SAMPLE_RATES`] after construction.
    pub sample_rate: u32,
    /// Number of frames per analysis block.
    pub chunk_size: usize,
    /// Input device to open by name. `None` selects the first device
    /// with at least one input channel.
    pub device: Option<String>,
}

impl DeviceConfig {
    /// Creates a configuration, clamping the sample rate to the
    /// supported set.
    ///
    /// An unsupported rate is not an error: it falls back to
    /// [`FALLBACK_SAMPLE_RATE`] with a diagnostic on stderr, so a
    /// mistyped rate never prevents startup.
    pub fn new(sample_rate: u32, chunk_size: usize) -> Self {
        let sample_rate = if SUPPORTED_SAMPLE_RATES.contains(&sample_rate) {
            sample_rate
        } else {
            eprintln!(
                "[CONFIG] Unsupported sample rate {} Hz, falling back to {} Hz",
                sample_rate, FALLBACK_SAMPLE_RATE
            );
            FALLBACK_SAMPLE_RATE
        };
        Self {
            sample_rate,
            chunk_size,
            device: None,
        }
    }

    /// Requests a specific input device by name.
    pub fn with_device(mut self, device: Option<String>) -> Self {
        self.device = device;
        self
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_CHUNK_SIZE)
    }
}
