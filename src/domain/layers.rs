//! Per-layer dissection results.
//!
//! These types are transient: they borrow the frame's bytes and live only
//! for the span of a single pipeline invocation.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use macaddr::MacAddr6;

/// TCP flag bits that participate in the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TcpFlags {
    pub syn: bool,
    pub ack: bool,
    pub fin: bool,
    pub rst: bool,
}

impl TcpFlags {
    /// Parse from the low flag byte of a TCP header (offset 13).
    pub fn from_u8(value: u8) -> Self {
        TcpFlags {
            fin: value & 0b0000_0001 != 0,
            syn: value & 0b0000_0010 != 0,
            rst: value & 0b0000_0100 != 0,
            ack: value & 0b0001_0000 != 0,
        }
    }
}

/// A decoded Ethernet header plus the bytes behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetLayer<'a> {
    pub source: MacAddr6,
    pub destination: MacAddr6,
    pub ethertype: u16,
    pub payload: &'a [u8],
}

/// A decoded network layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkLayer<'a> {
    Ipv4 {
        source: Ipv4Addr,
        destination: Ipv4Addr,
        protocol: u8,
        payload: &'a [u8],
    },
    Ipv6 {
        source: Ipv6Addr,
        destination: Ipv6Addr,
        next_header: u8,
        payload: &'a [u8],
    },
}

impl<'a> NetworkLayer<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            NetworkLayer::Ipv4 { .. } => "IPv4",
            NetworkLayer::Ipv6 { .. } => "IPv6",
        }
    }

    pub fn source(&self) -> IpAddr {
        match self {
            NetworkLayer::Ipv4 { source, .. } => IpAddr::V4(*source),
            NetworkLayer::Ipv6 { source, .. } => IpAddr::V6(*source),
        }
    }

    pub fn destination(&self) -> IpAddr {
        match self {
            NetworkLayer::Ipv4 { destination, .. } => IpAddr::V4(*destination),
            NetworkLayer::Ipv6 { destination, .. } => IpAddr::V6(*destination),
        }
    }

    /// IP protocol number of the encapsulated payload.
    pub fn inner_protocol(&self) -> u8 {
        match self {
            NetworkLayer::Ipv4 { protocol, .. } => *protocol,
            NetworkLayer::Ipv6 { next_header, .. } => *next_header,
        }
    }

    pub fn payload(&self) -> &'a [u8] {
        match self {
            NetworkLayer::Ipv4 { payload, .. } => payload,
            NetworkLayer::Ipv6 { payload, .. } => payload,
        }
    }
}

/// A decoded transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportLayer<'a> {
    Tcp {
        source_port: u16,
        destination_port: u16,
        flags: TcpFlags,
        payload: &'a [u8],
    },
    Udp {
        source_port: u16,
        destination_port: u16,
        payload: &'a [u8],
    },
    /// An IP protocol outside the handled set. Layer walking stops here
    /// and the remainder is treated as opaque payload.
    Other { protocol: u8, payload: &'a [u8] },
}
