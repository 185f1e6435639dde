//! The frame-to-record pipeline.
//!
//! [`PacketPipeline::process`] is total: every frame, however malformed,
//! produces a displayable record. Decode failures are caught at the stage
//! that produced them and fill the remaining fields with placeholders, so
//! the capture loop never sees an error from dissection.

use crate::classify;
use crate::dissect;
use crate::domain::{CapturedRecord, LinkType, RawFrame, TransportLayer};
use crate::render;

const UNKNOWN: &str = "Unknown";
const NON_ETHERNET_INFO: &str = "Non-Ethernet packet";
const TRUNCATED_INFO: &str = "Truncated frame";

/// Stateless dissection pipeline.
///
/// Holds only immutable configuration; `process` has no cross-call state
/// and is safe to invoke concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketPipeline {
    show_payload: bool,
}

impl PacketPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark emitted records so the consumer displays their payload block.
    pub fn with_show_payload(mut self, show_payload: bool) -> Self {
        self.show_payload = show_payload;
        self
    }

    /// Dissect one raw frame into a finished record.
    ///
    /// Walks Ethernet → IPv4/IPv6 → TCP/UDP as far as the bytes allow;
    /// each stage may short-circuit to emission with whatever was
    /// gathered so far.
    pub fn process(&self, frame: &RawFrame<'_>) -> CapturedRecord {
        if frame.link_type != LinkType::Ethernet {
            return self.emit(
                frame,
                UNKNOWN.to_string(),
                UNKNOWN.to_string(),
                frame.link_type.name(),
                NON_ETHERNET_INFO.to_string(),
                frame.bytes,
            );
        }

        let eth = match dissect::decode_ethernet(frame.bytes) {
            Ok(eth) => eth,
            Err(err) => {
                tracing::trace!(%err, "link layer decode failed");
                return self.emit(
                    frame,
                    UNKNOWN.to_string(),
                    UNKNOWN.to_string(),
                    UNKNOWN.to_string(),
                    TRUNCATED_INFO.to_string(),
                    frame.bytes,
                );
            }
        };

        let network = match dissect::decode_network(eth.ethertype, eth.payload) {
            Ok(Some(network)) => network,
            Ok(None) => {
                // Not an IP payload (ARP, LLDP, ...); stop at the link layer.
                return self.emit(
                    frame,
                    eth.source.to_string(),
                    eth.destination.to_string(),
                    "Ethernet".to_string(),
                    format!("EtherType 0x{:04X}", eth.ethertype),
                    eth.payload,
                );
            }
            Err(err) => {
                tracing::trace!(%err, "network layer decode failed");
                return self.emit(
                    frame,
                    eth.source.to_string(),
                    eth.destination.to_string(),
                    "Ethernet".to_string(),
                    TRUNCATED_INFO.to_string(),
                    eth.payload,
                );
            }
        };

        let source = network.source().to_string();
        let destination = network.destination().to_string();

        let transport = match dissect::decode_transport(network.inner_protocol(), network.payload()) {
            Ok(transport) => transport,
            Err(err) => {
                tracing::trace!(%err, "transport layer decode failed");
                return self.emit(
                    frame,
                    source,
                    destination,
                    network.name().to_string(),
                    TRUNCATED_INFO.to_string(),
                    network.payload(),
                );
            }
        };

        match transport {
            TransportLayer::Tcp {
                source_port,
                destination_port,
                flags,
                payload,
            } => self.emit(
                frame,
                source,
                destination,
                "TCP".to_string(),
                classify::summarize_tcp(source_port, destination_port, flags),
                payload,
            ),
            TransportLayer::Udp {
                source_port,
                destination_port,
                payload,
            } => self.emit(
                frame,
                source,
                destination,
                "UDP".to_string(),
                classify::summarize_udp(source_port, destination_port),
                payload,
            ),
            TransportLayer::Other { protocol, payload } => self.emit(
                frame,
                source,
                destination,
                network.name().to_string(),
                format!("IP protocol {}", protocol),
                payload,
            ),
        }
    }

    fn emit(
        &self,
        frame: &RawFrame<'_>,
        source: String,
        destination: String,
        protocol: String,
        info: String,
        residual: &[u8],
    ) -> CapturedRecord {
        CapturedRecord {
            timestamp: frame.timestamp,
            source,
            destination,
            protocol,
            length: frame.bytes.len(),
            info,
            payload: render::render(residual),
            show_payload: self.show_payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn frame_at_epoch(bytes: &[u8], link_type: LinkType) -> RawFrame<'_> {
        let timestamp = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        RawFrame::new(bytes, link_type, timestamp)
    }

    fn ethernet_frame(ethertype: u16, payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, // destination
            0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, // source
        ];
        frame.extend_from_slice(&ethertype.to_be_bytes());
        frame.extend_from_slice(payload);
        frame
    }

    fn ipv4_packet(protocol: u8, payload: &[u8]) -> Vec<u8> {
        let total_len = (20 + payload.len()) as u16;
        let mut packet = vec![0u8; 20];
        packet[0] = 0x45;
        packet[2..4].copy_from_slice(&total_len.to_be_bytes());
        packet[8] = 64;
        packet[9] = protocol;
        packet[12..16].copy_from_slice(&[192, 168, 1, 10]);
        packet[16..20].copy_from_slice(&[192, 168, 1, 20]);
        packet.extend_from_slice(payload);
        packet
    }

    fn ipv6_packet(next_header: u8, payload: &[u8]) -> Vec<u8> {
        let mut packet = vec![0u8; 40];
        packet[0] = 0x60; // version 6
        packet[4..6].copy_from_slice(&(payload.len() as u16).to_be_bytes());
        packet[6] = next_header;
        packet[23] = 1; // source ::1
        packet[39] = 2; // destination ::2
        packet.extend_from_slice(payload);
        packet
    }

    fn tcp_segment(src: u16, dst: u16, flags: u8, payload: &[u8]) -> Vec<u8> {
        let mut segment = vec![0u8; 20];
        segment[0..2].copy_from_slice(&src.to_be_bytes());
        segment[2..4].copy_from_slice(&dst.to_be_bytes());
        segment[12] = 0x50;
        segment[13] = flags;
        segment.extend_from_slice(payload);
        segment
    }

    fn udp_datagram(src: u16, dst: u16, payload: &[u8]) -> Vec<u8> {
        let length = (8 + payload.len()) as u16;
        let mut datagram = vec![0u8; 8];
        datagram[0..2].copy_from_slice(&src.to_be_bytes());
        datagram[2..4].copy_from_slice(&dst.to_be_bytes());
        datagram[4..6].copy_from_slice(&length.to_be_bytes());
        datagram.extend_from_slice(payload);
        datagram
    }

    fn assert_fields_non_empty(record: &CapturedRecord) {
        assert!(!record.source.is_empty());
        assert!(!record.destination.is_empty());
        assert!(!record.protocol.is_empty());
        assert!(!record.info.is_empty());
        assert!(!record.payload.is_empty());
    }

    #[test]
    fn test_tcp_syn_ack_to_443() {
        let tcp = tcp_segment(49152, 443, 0b0001_0010, &[]);
        let ip = ipv4_packet(6, &tcp);
        let bytes = ethernet_frame(0x0800, &ip);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);

        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "TCP");
        assert_eq!(record.source, "192.168.1.10");
        assert_eq!(record.destination, "192.168.1.20");
        assert_eq!(record.info, "TCP 49152 -> 443 [SYN] [ACK] (HTTPS)");
        assert_eq!(record.length, bytes.len());
        assert_eq!(record.payload, "No payload");
    }

    #[test]
    fn test_udp_to_53_labeled_dns() {
        let udp = udp_datagram(5353, 53, &[0xab, 0xcd]);
        let ip = ipv4_packet(17, &udp);
        let bytes = ethernet_frame(0x0800, &ip);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);

        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "UDP");
        assert!(record.info.ends_with("(DNS)"));
        assert_eq!(record.payload, "Hex: AB CD");
    }

    #[test]
    fn test_ipv6_tcp_syn_to_443() {
        let tcp = tcp_segment(52000, 443, 0b0000_0010, &[]);
        let ip = ipv6_packet(6, &tcp);
        let bytes = ethernet_frame(0x86DD, &ip);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);

        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "TCP");
        assert_eq!(record.source, "::1");
        assert_eq!(record.destination, "::2");
        assert_eq!(record.info, "TCP 52000 -> 443 [SYN] (HTTPS)");
        assert_eq!(record.payload, "No payload");
    }

    #[test]
    fn test_ipv6_udp_to_53_labeled_dns() {
        let udp = udp_datagram(40000, 53, &[0x12, 0x34]);
        let ip = ipv6_packet(17, &udp);
        let bytes = ethernet_frame(0x86DD, &ip);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);

        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "UDP");
        assert_eq!(record.source, "::1");
        assert_eq!(record.destination, "::2");
        assert_eq!(record.info, "UDP 40000 -> 53 (DNS)");
        assert_eq!(record.payload, "Hex: 12 34");
    }

    #[test]
    fn test_tcp_payload_renders_as_text() {
        let tcp = tcp_segment(40000, 80, 0b0001_1000, b"GET / HTTP/1.1\r\n");
        let ip = ipv4_packet(6, &tcp);
        let bytes = ethernet_frame(0x0800, &ip);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);

        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.info, "TCP 40000 -> 80 [ACK] (HTTP)");
        assert!(record.payload.starts_with("ASCII: GET / HTTP/1.1\\r\\n\n"));
    }

    #[test]
    fn test_short_frames_degrade_to_unknown() {
        for len in 0..14 {
            let bytes = vec![0xaau8; len];
            let frame = frame_at_epoch(&bytes, LinkType::Ethernet);
            let record = PacketPipeline::new().process(&frame);

            assert_eq!(record.protocol, "Unknown");
            assert_eq!(record.source, "Unknown");
            assert_eq!(record.destination, "Unknown");
            assert_eq!(record.info, "Truncated frame");
            assert_eq!(record.length, len);
            assert_fields_non_empty(&record);
        }
    }

    #[test]
    fn test_non_ethernet_link_type() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        let frame = frame_at_epoch(&bytes, LinkType::Unknown(147));
        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "DLT(147)");
        assert_eq!(record.info, "Non-Ethernet packet");
        assert_eq!(record.source, "Unknown");
        assert_eq!(record.destination, "Unknown");
        assert_eq!(record.payload, "Hex: 01 02 03 04");
    }

    #[test]
    fn test_arp_stops_at_link_layer() {
        let bytes = ethernet_frame(0x0806, &[0u8; 28]);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);
        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "Ethernet");
        assert_eq!(record.source, "66:77:88:99:AA:BB");
        assert_eq!(record.destination, "00:11:22:33:44:55");
        assert_eq!(record.info, "EtherType 0x0806");
    }

    #[test]
    fn test_icmp_reports_ip_protocol_number() {
        let ip = ipv4_packet(1, &[8, 0, 0x12, 0x34]);
        let bytes = ethernet_frame(0x0800, &ip);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);
        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "IPv4");
        assert_eq!(record.info, "IP protocol 1");
        assert_eq!(record.source, "192.168.1.10");
    }

    #[test]
    fn test_truncated_transport_degrades_to_network_layer() {
        // IP claims TCP but carries only 4 payload bytes
        let ip = ipv4_packet(6, &[0xde, 0xad, 0xbe, 0xef]);
        let bytes = ethernet_frame(0x0800, &ip);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);
        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "IPv4");
        assert_eq!(record.info, "Truncated frame");
        assert_eq!(record.source, "192.168.1.10");
        assert_fields_non_empty(&record);
    }

    #[test]
    fn test_truncated_network_degrades_to_ethernet() {
        let bytes = ethernet_frame(0x0800, &[0x45, 0x00]);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);
        let record = PacketPipeline::new().process(&frame);

        assert_eq!(record.protocol, "Ethernet");
        assert_eq!(record.info, "Truncated frame");
        assert_fields_non_empty(&record);
    }

    #[test]
    fn test_process_is_deterministic() {
        let tcp = tcp_segment(1234, 22, 0b0000_0010, b"SSH-2.0");
        let ip = ipv4_packet(6, &tcp);
        let bytes = ethernet_frame(0x0800, &ip);
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);

        let pipeline = PacketPipeline::new();
        assert_eq!(pipeline.process(&frame), pipeline.process(&frame));
    }

    #[test]
    fn test_show_payload_flag_propagates() {
        let bytes = ethernet_frame(0x0800, &ipv4_packet(17, &udp_datagram(1, 2, b"x")));
        let frame = frame_at_epoch(&bytes, LinkType::Ethernet);

        assert!(!PacketPipeline::new().process(&frame).show_payload);
        assert!(
            PacketPipeline::new()
                .with_show_payload(true)
                .process(&frame)
                .show_payload
        );
    }

    #[test]
    fn test_arbitrary_bytes_always_yield_valid_records() {
        // xorshift-style generator keeps this reproducible
        let mut state: u64 = 0x9e3779b97f4a7c15;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        let pipeline = PacketPipeline::new();
        for round in 0..2000 {
            let len = (next() % 200) as usize;
            let bytes: Vec<u8> = (0..len).map(|_| next() as u8).collect();
            let frame = frame_at_epoch(&bytes, LinkType::Ethernet);

            let record = pipeline.process(&frame);
            assert_eq!(record.length, len, "round {}", round);
            assert_fields_non_empty(&record);
        }
    }
}
