//! Capture thread driving frames through the pipeline.

use std::sync::atomic::AtomicBool;
use std::sync::mpsc::SyncSender;
use std::sync::Arc;

use super::FrameSource;
use crate::domain::{CapturedRecord, RawFrame};
use crate::error::CaptureError;
use crate::pipeline::PacketPipeline;

/// Capacity of the record channel between the capture thread and the
/// consumer. The capture thread blocks when the consumer falls behind.
pub const RECORD_CHANNEL_CAPACITY: usize = 1024;

/// Owns the capture loop: dissects each arriving frame and hands the
/// record to the consumer channel.
///
/// The channel is the sole serialization point; the pipeline itself is
/// stateless and runs entirely on the capture thread.
pub struct CaptureCoordinator {
    pipeline: PacketPipeline,
    ip_only: bool,
}

impl CaptureCoordinator {
    pub fn new(pipeline: PacketPipeline) -> Self {
        Self {
            pipeline,
            ip_only: false,
        }
    }

    /// Suppress records whose dissection did not reach an IP layer.
    pub fn with_ip_only(mut self, ip_only: bool) -> Self {
        self.ip_only = ip_only;
        self
    }

    /// Run the capture loop until the running flag clears or the
    /// consumer goes away.
    pub fn run<S: FrameSource>(
        &self,
        source: &mut S,
        records: SyncSender<CapturedRecord>,
        running: Arc<AtomicBool>,
    ) -> Result<(), CaptureError> {
        let frames = source.frames(running)?;

        for frame in frames {
            let raw = RawFrame::new(&frame.data, frame.link_type, frame.timestamp);
            let record = self.pipeline.process(&raw);

            if self.ip_only && !record.is_ip() {
                continue;
            }

            if records.send(record).is_err() {
                tracing::info!("record consumer dropped, stopping capture");
                break;
            }
        }

        Ok(())
    }
}
