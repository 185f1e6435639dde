//! Transport-layer summary lines and well-known port labels.

use crate::domain::TcpFlags;

/// Transport protocols that participate in port labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Tcp,
    Udp,
}

/// Well-known application protocols keyed by transport and destination
/// port. Extending coverage is a data edit here, not a code change.
const WELL_KNOWN_PORTS: &[(Transport, u16, &str)] = &[
    (Transport::Tcp, 80, "HTTP"),
    (Transport::Tcp, 443, "HTTPS"),
    (Transport::Tcp, 22, "SSH"),
    (Transport::Udp, 53, "DNS"),
    (Transport::Udp, 67, "DHCP"),
    (Transport::Udp, 68, "DHCP"),
];

/// Look up the application-protocol label for a destination port.
pub fn well_known_label(transport: Transport, destination_port: u16) -> Option<&'static str> {
    WELL_KNOWN_PORTS
        .iter()
        .find(|(t, port, _)| *t == transport && *port == destination_port)
        .map(|(_, _, label)| *label)
}

/// Build the summary line for a TCP segment.
///
/// Flag tags appear in a fixed order regardless of which are set, then
/// the well-known label for the destination port, if any.
pub fn summarize_tcp(source_port: u16, destination_port: u16, flags: TcpFlags) -> String {
    let mut info = format!("TCP {} -> {}", source_port, destination_port);

    if flags.syn {
        info.push_str(" [SYN]");
    }
    if flags.ack {
        info.push_str(" [ACK]");
    }
    if flags.fin {
        info.push_str(" [FIN]");
    }
    if flags.rst {
        info.push_str(" [RST]");
    }

    if let Some(label) = well_known_label(Transport::Tcp, destination_port) {
        info.push_str(&format!(" ({})", label));
    }

    info
}

/// Build the summary line for a UDP datagram.
pub fn summarize_udp(source_port: u16, destination_port: u16) -> String {
    let mut info = format!("UDP {} -> {}", source_port, destination_port);

    if let Some(label) = well_known_label(Transport::Udp, destination_port) {
        info.push_str(&format!(" ({})", label));
    }

    info
}
