//! Live packet capture and dissection.
//!
//! Captures frames from a network interface, walks their protocol layers
//! (Ethernet → IPv4/IPv6 → TCP/UDP), labels well-known application
//! protocols by destination port, and renders residual payload bytes as
//! hex/ASCII. The dissection pipeline is pure and total: malformed input
//! degrades to placeholder fields instead of errors, so the capture loop
//! can never be crashed by bytes from the wire.

pub mod capture;
pub mod classify;
pub mod dissect;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod reporter;
