//! # Driver Loop Module
//!
//! The consumer side of the pipeline: a fixed-cadence poll that pops at
//! most one block per tick, analyzes it, and forwards the result to a
//! caller-supplied sink. The fixed interval is a deliberate throttle
//! decoupling display cadence from capture cadence; capture never waits
//! on this loop.

use crate::SpectrumResult;
use crate::queue::SampleQueue;
use crate::spectrum::SpectralAnalyzer;
use crossbeam_channel::{Receiver, select};
use std::time::Duration;

/// Default pause between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Runs the polling loop until a message (or disconnect) arrives on the
/// shutdown channel.
///
/// Each iteration waits up to `interval` for shutdown, then drains one
/// block in FIFO order. A tick with no pending block, or a block with
/// no signal, produces no call to the sink. The loop never terminates
/// on its own; the shutdown channel is the only exit, so teardown is
/// prompt even while the queue sits empty.
pub fn run<F>(
    queue: &SampleQueue,
    analyzer: &mut SpectralAnalyzer,
    interval: Duration,
    shutdown: &Receiver<()>,
    mut on_result: F,
) where
    F: FnMut(&SpectrumResult),
{
    loop {
        select! {
            recv(shutdown) -> _ => break,
            default(interval) => {
                if let Some(block) = queue.pop_latest() {
                    if let Some(result) = analyzer.analyze(&block) {
                        on_result(&result);
                    }
                }
            }
        }
    }
}
