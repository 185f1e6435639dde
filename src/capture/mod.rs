//! Frame capture abstraction.
//!
//! Defines the `FrameSource` trait and a pnet-based implementation, so
//! the coordinator can run against mock or replayed sources in tests and
//! capture backends stay swappable.

mod coordinator;
mod pnet_capture;

pub use coordinator::{CaptureCoordinator, RECORD_CHANNEL_CAPACITY};
pub use pnet_capture::PnetCapture;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::LinkType;
use crate::error::CaptureError;

/// One captured frame, owned so it can outlive the receive buffer and
/// cross the capture thread boundary.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub data: Vec<u8>,
    pub link_type: LinkType,
    pub timestamp: DateTime<Utc>,
}

/// Trait for live frame sources.
pub trait FrameSource: Send {
    /// Open the capture channel and return an iterator over frames.
    ///
    /// The iterator ends when the running flag is cleared.
    fn frames(
        &mut self,
        running: Arc<AtomicBool>,
    ) -> Result<Box<dyn Iterator<Item = CapturedFrame> + '_>, CaptureError>;

    /// Name of the interface being captured.
    fn interface_name(&self) -> &str;
}
