//! pnet-based frame source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pnet::datalink::{self, Channel, Config, NetworkInterface};

use super::{CapturedFrame, FrameSource};
use crate::domain::LinkType;
use crate::error::CaptureError;

/// How long a channel read may block before the running flag is
/// rechecked, keeping shutdown prompt.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Frame capture using the pnet library.
pub struct PnetCapture {
    interface: NetworkInterface,
    promiscuous: bool,
}

impl PnetCapture {
    /// Create a capture on the specified interface.
    pub fn new(interface_name: &str) -> Result<Self, CaptureError> {
        let interface = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.name == interface_name)
            .ok_or_else(|| CaptureError::InterfaceNotFound(interface_name.to_string()))?;

        Ok(Self {
            interface,
            promiscuous: true,
        })
    }

    /// Create a capture on the first suitable interface.
    ///
    /// Looks for an interface that is up, not a loopback, and has an
    /// address.
    pub fn on_default_interface() -> Result<Self, CaptureError> {
        let interface = datalink::interfaces()
            .into_iter()
            .find(|iface| iface.is_up() && !iface.is_loopback() && !iface.ips.is_empty())
            .ok_or_else(|| {
                CaptureError::InterfaceNotFound("no suitable interface found".to_string())
            })?;

        Ok(Self {
            interface,
            promiscuous: true,
        })
    }

    /// Enable or disable promiscuous mode for the capture channel.
    pub fn with_promiscuous(mut self, promiscuous: bool) -> Self {
        self.promiscuous = promiscuous;
        self
    }

    /// List all available network interfaces.
    pub fn list_interfaces() -> Vec<String> {
        datalink::interfaces()
            .into_iter()
            .map(|iface| {
                let status = if iface.is_up() { "UP" } else { "DOWN" };
                let ips: Vec<_> = iface.ips.iter().map(|ip| ip.to_string()).collect();
                format!(
                    "{}: {} [{}]",
                    iface.name,
                    status,
                    if ips.is_empty() {
                        "no IP".to_string()
                    } else {
                        ips.join(", ")
                    }
                )
            })
            .collect()
    }
}

impl FrameSource for PnetCapture {
    fn frames(
        &mut self,
        running: Arc<AtomicBool>,
    ) -> Result<Box<dyn Iterator<Item = CapturedFrame> + '_>, CaptureError> {
        let config = Config {
            read_timeout: Some(READ_TIMEOUT),
            promiscuous: self.promiscuous,
            ..Config::default()
        };

        let (_tx, rx) = match datalink::channel(&self.interface, config) {
            Ok(Channel::Ethernet(tx, rx)) => (tx, rx),
            Ok(_) => {
                return Err(CaptureError::ChannelCreation(
                    "unsupported channel type".to_string(),
                ))
            }
            Err(e) => {
                let msg = e.to_string();
                if msg.contains("permission") || msg.contains("Operation not permitted") {
                    return Err(CaptureError::InsufficientPermissions);
                }
                return Err(CaptureError::ChannelCreation(msg));
            }
        };

        Ok(Box::new(FrameIterator { rx, running }))
    }

    fn interface_name(&self) -> &str {
        &self.interface.name
    }
}

/// Iterator yielding frames from the datalink channel until the running
/// flag clears.
struct FrameIterator {
    rx: Box<dyn datalink::DataLinkReceiver>,
    running: Arc<AtomicBool>,
}

impl Iterator for FrameIterator {
    type Item = CapturedFrame;

    fn next(&mut self) -> Option<Self::Item> {
        while self.running.load(Ordering::Relaxed) {
            match self.rx.next() {
                Ok(packet) => {
                    // pnet Ethernet channels always deliver Ethernet frames
                    return Some(CapturedFrame {
                        data: packet.to_vec(),
                        link_type: LinkType::Ethernet,
                        timestamp: Utc::now(),
                    });
                }
                Err(e) => {
                    // Timeout is expected, keep polling
                    if e.kind() == std::io::ErrorKind::TimedOut {
                        continue;
                    }
                    tracing::debug!("capture read error: {}", e);
                }
            }
        }
        None
    }
}
