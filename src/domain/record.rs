//! Captured frames and the records the pipeline emits for them.

use chrono::{DateTime, Utc};

/// Link-layer type reported by the capture source.
///
/// `PnetCapture` only ever reports `Ethernet`; the other variants cover
/// sources that hand the pipeline non-Ethernet frames (pcap file replay,
/// loopback or raw-IP tunnel captures). The pipeline short-circuits them
/// to an opaque-payload record labeled with the variant's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    Ethernet,
    Loopback,
    RawIp,
    Unknown(u16),
}

impl LinkType {
    /// Display name, used verbatim as the protocol label of frames whose
    /// link layer is not dissected.
    pub fn name(&self) -> String {
        match self {
            LinkType::Ethernet => "Ethernet".to_string(),
            LinkType::Loopback => "Loopback".to_string(),
            LinkType::RawIp => "RawIP".to_string(),
            LinkType::Unknown(dlt) => format!("DLT({})", dlt),
        }
    }
}

/// One captured link-layer frame.
///
/// The pipeline borrows the bytes for the duration of a single `process`
/// call and copies out everything it keeps.
#[derive(Debug, Clone, Copy)]
pub struct RawFrame<'a> {
    pub bytes: &'a [u8],
    pub link_type: LinkType,
    pub timestamp: DateTime<Utc>,
}

impl<'a> RawFrame<'a> {
    pub fn new(bytes: &'a [u8], link_type: LinkType, timestamp: DateTime<Utc>) -> Self {
        Self {
            bytes,
            link_type,
            timestamp,
        }
    }
}

/// The finished record for one processed frame.
///
/// Every text field is non-empty and directly displayable: degraded
/// dissection fills in explicit placeholders (`"Unknown"`, `"No payload"`)
/// instead of leaving fields blank. Created once per frame and immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    /// Wall-clock instant the frame was captured.
    pub timestamp: DateTime<Utc>,
    /// Source address, or `"Unknown"`.
    pub source: String,
    /// Destination address, or `"Unknown"`.
    pub destination: String,
    /// Name of the deepest successfully decoded layer's protocol.
    pub protocol: String,
    /// Total frame length in bytes.
    pub length: usize,
    /// Human-readable summary line.
    pub info: String,
    /// Hex/ASCII rendering of the residual payload.
    pub payload: String,
    /// Whether the consumer should display the payload block.
    pub show_payload: bool,
}

impl CapturedRecord {
    /// True when dissection reached an IP network layer.
    pub fn is_ip(&self) -> bool {
        matches!(self.protocol.as_str(), "TCP" | "UDP" | "IPv4" | "IPv6")
    }
}
