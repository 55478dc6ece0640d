//! # Sample Queue Module
//!
//! Single-producer/single-consumer hand-off between the audio callback
//! and the analysis loop, built on a bounded crossbeam channel.
//!
//! The producer side runs on the driver-managed real-time thread, so
//! `push` must never block: when the queue is full the oldest pending
//! block is dropped to make room. The consumer polls on its own cadence,
//! so `pop_latest` must never block either: an empty queue is a normal
//! state meaning "no new audio since the last poll".

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

/// One channel of one fixed time window of samples.
pub type SampleBlock = Vec<f32>;

/// Default number of pending blocks before the oldest is dropped.
///
/// In steady state at most one block is in flight; the extra depth only
/// absorbs bursts when the consumer tick is slower than capture.
pub const DEFAULT_QUEUE_DEPTH: usize = 8;

/// Bounded hand-off queue carrying audio blocks from capture to analysis.
///
/// Cloning the queue shares the same channel, so the capture callback
/// holds one clone while the driver loop pops from another.
#[derive(Debug, Clone)]
pub struct SampleQueue {
    tx: Sender<SampleBlock>,
    rx: Receiver<SampleBlock>,
}

impl SampleQueue {
    /// Creates a queue holding at most `depth` pending blocks.
    pub fn new(depth: usize) -> Self {
        let (tx, rx) = bounded(depth);
        Self { tx, rx }
    }

    /// Appends a block to the tail. Never blocks.
    ///
    /// On overflow the oldest pending block is discarded so the new one
    /// always fits. Dropping stale audio is the right trade for a tuner:
    /// the consumer only ever wants recent blocks.
    pub fn push(&self, block: SampleBlock) {
        if let Err(TrySendError::Full(block)) = self.tx.try_send(block) {
            let _ = self.rx.try_recv();
            let _ = self.tx.try_send(block);
        }
    }

    /// Removes and returns the oldest pending block, or `None` when no
    /// new audio arrived since the last poll. Never blocks.
    pub fn pop_latest(&self) -> Option<SampleBlock> {
        self.rx.try_recv().ok()
    }

    /// Number of blocks currently pending.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for SampleQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_DEPTH)
    }
}
