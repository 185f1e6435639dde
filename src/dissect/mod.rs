//! Layer decoding on top of pnet packet views.
//!
//! Every decode validates length before reading any header field: a slice
//! shorter than the layer's minimum header is a [`DecodeError::Truncated`],
//! never an out-of-bounds access. Variable-length fields (IPv4 IHL, TCP
//! data offset) are bounds-checked against the slice before the residual
//! payload is cut, so malformed headers surface as
//! [`DecodeError::MalformedField`] instead of panics.

use macaddr::MacAddr6;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::udp::UdpPacket;

use crate::domain::{EthernetLayer, NetworkLayer, TcpFlags, TransportLayer};
use crate::error::DecodeError;

const ETHERNET_HEADER_LEN: usize = 14;
const IPV4_MIN_HEADER_LEN: usize = 20;
const IPV6_HEADER_LEN: usize = 40;
const TCP_MIN_HEADER_LEN: usize = 20;
const UDP_HEADER_LEN: usize = 8;

/// Decode an Ethernet II header.
pub fn decode_ethernet(bytes: &[u8]) -> Result<EthernetLayer<'_>, DecodeError> {
    let eth = EthernetPacket::new(bytes).ok_or(DecodeError::Truncated {
        layer: "Ethernet",
        expected: ETHERNET_HEADER_LEN,
        actual: bytes.len(),
    })?;

    Ok(EthernetLayer {
        source: MacAddr6::from(eth.get_source().octets()),
        destination: MacAddr6::from(eth.get_destination().octets()),
        ethertype: eth.get_ethertype().0,
        payload: &bytes[ETHERNET_HEADER_LEN..],
    })
}

/// Decode the network layer behind an Ethernet header.
///
/// Returns `Ok(None)` for EtherTypes outside the IPv4/IPv6 chain (ARP,
/// LLDP, ...) so the caller can stop walking and treat the remainder as
/// opaque.
pub fn decode_network(ethertype: u16, bytes: &[u8]) -> Result<Option<NetworkLayer<'_>>, DecodeError> {
    if ethertype == EtherTypes::Ipv4.0 {
        decode_ipv4(bytes).map(Some)
    } else if ethertype == EtherTypes::Ipv6.0 {
        decode_ipv6(bytes).map(Some)
    } else {
        Ok(None)
    }
}

fn decode_ipv4(bytes: &[u8]) -> Result<NetworkLayer<'_>, DecodeError> {
    let ip = Ipv4Packet::new(bytes).ok_or(DecodeError::Truncated {
        layer: "IPv4",
        expected: IPV4_MIN_HEADER_LEN,
        actual: bytes.len(),
    })?;

    let header_len = ip.get_header_length() as usize * 4;
    if header_len < IPV4_MIN_HEADER_LEN || header_len > bytes.len() {
        return Err(DecodeError::MalformedField {
            layer: "IPv4",
            field: "header length",
            value: ip.get_header_length() as u32,
        });
    }

    let total_len = ip.get_total_length() as usize;
    if total_len < header_len {
        return Err(DecodeError::MalformedField {
            layer: "IPv4",
            field: "total length",
            value: total_len as u32,
        });
    }

    // The total length field excludes any link-layer trailer padding.
    let end = total_len.min(bytes.len());

    Ok(NetworkLayer::Ipv4 {
        source: ip.get_source(),
        destination: ip.get_destination(),
        protocol: ip.get_next_level_protocol().0,
        payload: &bytes[header_len..end],
    })
}

fn decode_ipv6(bytes: &[u8]) -> Result<NetworkLayer<'_>, DecodeError> {
    let ip = Ipv6Packet::new(bytes).ok_or(DecodeError::Truncated {
        layer: "IPv6",
        expected: IPV6_HEADER_LEN,
        actual: bytes.len(),
    })?;

    let end = (IPV6_HEADER_LEN + ip.get_payload_length() as usize).min(bytes.len());

    Ok(NetworkLayer::Ipv6 {
        source: ip.get_source(),
        destination: ip.get_destination(),
        next_header: ip.get_next_header().0,
        payload: &bytes[IPV6_HEADER_LEN..end],
    })
}

/// Decode the transport layer for a given IP protocol number.
///
/// Protocols outside the handled set are not failures: they yield
/// [`TransportLayer::Other`] carrying the raw protocol number and the full
/// residual payload.
pub fn decode_transport(protocol: u8, bytes: &[u8]) -> Result<TransportLayer<'_>, DecodeError> {
    if protocol == IpNextHeaderProtocols::Tcp.0 {
        decode_tcp(bytes)
    } else if protocol == IpNextHeaderProtocols::Udp.0 {
        decode_udp(bytes)
    } else {
        Ok(TransportLayer::Other { protocol, payload: bytes })
    }
}

fn decode_tcp(bytes: &[u8]) -> Result<TransportLayer<'_>, DecodeError> {
    let tcp = TcpPacket::new(bytes).ok_or(DecodeError::Truncated {
        layer: "TCP",
        expected: TCP_MIN_HEADER_LEN,
        actual: bytes.len(),
    })?;

    let data_offset = tcp.get_data_offset() as usize * 4;
    if data_offset < TCP_MIN_HEADER_LEN || data_offset > bytes.len() {
        return Err(DecodeError::MalformedField {
            layer: "TCP",
            field: "data offset",
            value: tcp.get_data_offset() as u32,
        });
    }

    Ok(TransportLayer::Tcp {
        source_port: tcp.get_source(),
        destination_port: tcp.get_destination(),
        flags: TcpFlags::from_u8(bytes[13]),
        payload: &bytes[data_offset..],
    })
}

fn decode_udp(bytes: &[u8]) -> Result<TransportLayer<'_>, DecodeError> {
    let udp = UdpPacket::new(bytes).ok_or(DecodeError::Truncated {
        layer: "UDP",
        expected: UDP_HEADER_LEN,
        actual: bytes.len(),
    })?;

    let udp_len = udp.get_length() as usize;
    if udp_len < UDP_HEADER_LEN {
        return Err(DecodeError::MalformedField {
            layer: "UDP",
            field: "length",
            value: udp_len as u32,
        });
    }

    // The length field covers header plus payload; trailing link-layer
    // padding beyond it is dropped.
    let end = udp_len.min(bytes.len());

    Ok(TransportLayer::Udp {
        source_port: udp.get_source(),
        destination_port: udp.get_destination(),
        payload: &bytes[UDP_HEADER_LEN..end],
    })
}
