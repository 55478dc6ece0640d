//! # Audio Capture Module
//!
//! Real-time audio capture using CPAL (Cross-Platform Audio Library).
//! Opens an input stream on the configured device and feeds fixed-size
//! single-channel blocks into a [`SampleQueue`].
//!
//! The stream callback runs on a driver-managed real-time thread. It
//! only extracts channel 0 from the interleaved buffer, accumulates
//! samples until a full block is ready, and performs a non-blocking
//! enqueue. Driver-reported stream errors are logged to stderr and do
//! not abort capture.

use crate::config::DeviceConfig;
use crate::queue::{SampleBlock, SampleQueue};
use anyhow::{Context, Result, anyhow};
use cpal::SupportedStreamConfigRange;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

/// Owns a running input stream for the lifetime of the capture.
///
/// Dropping the handle releases the device; [`AudioCapture::stop`] does
/// the same explicitly after pausing the stream.
pub struct AudioCapture {
    stream: cpal::Stream,
    sample_rate: u32,
}

impl AudioCapture {
    /// Opens the configured input device and starts capturing.
    ///
    /// Device selection: the named device when `config.device` is set,
    /// otherwise the first device with at least one input channel.
    /// Setup failures (no device, no usable f32 format, stream build or
    /// play errors) are fatal: a tuner has no function without capture.
    pub fn start(config: &DeviceConfig, queue: SampleQueue) -> Result<Self> {
        let host = cpal::default_host();
        let device = select_input_device(&host, config.device.as_deref())?;

        eprintln!(
            "[AUDIO] Using input device: {}",
            device.name().unwrap_or_else(|_| "<unnamed>".to_string())
        );

        let ranges = device
            .supported_input_configs()
            .context("failed to query input configurations")?
            .collect::<Vec<_>>();
        let supported = find_supported_config(ranges, config.sample_rate)
            .ok_or_else(|| anyhow!("no suitable f32 input format found"))?;

        // The device may not span the requested rate exactly; stay
        // inside its advertised range and report what was negotiated.
        let sample_rate = config
            .sample_rate
            .clamp(supported.min_sample_rate().0, supported.max_sample_rate().0);
        let stream_config: cpal::StreamConfig = supported
            .with_sample_rate(cpal::SampleRate(sample_rate))
            .into();
        let channels = stream_config.channels as usize;

        eprintln!(
            "[AUDIO] Capturing at {} Hz, {} channel(s), {} frames per block",
            sample_rate, channels, config.chunk_size
        );

        let mut assembler = BlockAssembler::new(config.chunk_size);
        let err_fn = |err: cpal::StreamError| {
            // Degraded stream status (overflow, device hiccups) is a
            // diagnostic, not a reason to stop a best-effort tuner.
            eprintln!("[AUDIO] Stream error: {err}");
        };

        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    assembler.push_interleaved(data, channels, &queue);
                },
                err_fn,
                None,
            )
            .context("failed to build input stream")?;

        stream.play().context("failed to start input stream")?;

        Ok(Self {
            stream,
            sample_rate,
        })
    }

    /// Rate the stream was actually opened at. The analyzer must be
    /// constructed with this value, not the requested one.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Pauses the stream and releases the device.
    pub fn stop(self) -> Result<()> {
        self.stream
            .pause()
            .context("failed to pause input stream")?;
        Ok(())
    }
}

/// Names of all input-capable devices on the default host.
pub fn input_device_names() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let names = host
        .input_devices()
        .context("failed to enumerate input devices")?
        .filter_map(|device| device.name().ok())
        .collect();
    Ok(names)
}

fn select_input_device(host: &cpal::Host, name: Option<&str>) -> Result<cpal::Device> {
    let mut devices = host
        .input_devices()
        .context("failed to enumerate input devices")?;
    match name {
        Some(wanted) => devices
            .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
            .ok_or_else(|| anyhow!("input device {wanted:?} not found")),
        None => devices
            .next()
            .ok_or_else(|| anyhow!("no input devices available")),
    }
}

/// Finds the f32 input configuration whose rate range lies closest to
/// the target rate, regardless of channel count (the callback keeps
/// only channel 0).
fn find_supported_config(
    ranges: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<SupportedStreamConfigRange> {
    ranges
        .into_iter()
        .filter(|c| c.sample_format() == cpal::SampleFormat::F32)
        .min_by_key(|c| {
            let min_diff = (c.min_sample_rate().0 as i64 - target_rate as i64).abs();
            let max_diff = (c.max_sample_rate().0 as i64 - target_rate as i64).abs();
            min_diff.min(max_diff)
        })
}

/// Reassembles the driver's variable-sized interleaved buffers into
/// fixed-size single-channel blocks.
///
/// CPAL makes no promise about callback buffer sizes, so samples are
/// accumulated until a full `chunk_size` block is ready; one callback
/// may complete zero or several blocks.
struct BlockAssembler {
    chunk_size: usize,
    pending: Vec<f32>,
}

impl BlockAssembler {
    fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            pending: Vec::with_capacity(chunk_size * 2),
        }
    }

    /// Extracts channel 0 from an interleaved buffer and enqueues every
    /// completed block.
    fn push_interleaved(&mut self, data: &[f32], channels: usize, queue: &SampleQueue) {
        self.pending.extend(data.iter().step_by(channels.max(1)));
        while self.pending.len() >= self.chunk_size {
            let block: SampleBlock = self.pending.drain(..self.chunk_size).collect();
            queue.push(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_channel_zero_from_interleaved_stereo() {
        let queue = SampleQueue::new(4);
        let mut assembler = BlockAssembler::new(4);

        // Interleaved stereo: left = 1..4, right = negative mirror.
        let data = [1.0, -1.0, 2.0, -2.0, 3.0, -3.0, 4.0, -4.0];
        assembler.push_interleaved(&data, 2, &queue);

        assert_eq!(queue.pop_latest(), Some(vec![1.0, 2.0, 3.0, 4.0]));
        assert!(queue.pop_latest().is_none());
    }

    #[test]
    fn accumulates_partial_buffers_across_callbacks() {
        let queue = SampleQueue::new(4);
        let mut assembler = BlockAssembler::new(4);

        assembler.push_interleaved(&[1.0, 2.0, 3.0], 1, &queue);
        assert!(queue.pop_latest().is_none());

        assembler.push_interleaved(&[4.0, 5.0], 1, &queue);
        assert_eq!(queue.pop_latest(), Some(vec![1.0, 2.0, 3.0, 4.0]));
        assert!(queue.pop_latest().is_none()); // 5.0 still pending
    }

    #[test]
    fn one_callback_can_complete_several_blocks() {
        let queue = SampleQueue::new(4);
        let mut assembler = BlockAssembler::new(2);

        assembler.push_interleaved(&[1.0, 2.0, 3.0, 4.0, 5.0], 1, &queue);

        assert_eq!(queue.pop_latest(), Some(vec![1.0, 2.0]));
        assert_eq!(queue.pop_latest(), Some(vec![3.0, 4.0]));
        assert!(queue.pop_latest().is_none());
    }

    #[test]
    fn mono_input_passes_through_unchanged() {
        let queue = SampleQueue::new(4);
        let mut assembler = BlockAssembler::new(3);

        assembler.push_interleaved(&[0.5, -0.5, 0.25], 1, &queue);
        assert_eq!(queue.pop_latest(), Some(vec![0.5, -0.5, 0.25]));
    }
}
