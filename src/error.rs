//! Error types for the capture lifecycle and the dissection core.

use thiserror::Error;

/// Errors raised while opening or running a live capture.
///
/// These are the only failures a user ever sees; dissection errors are
/// absorbed inside the pipeline.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    #[error("Failed to create capture channel: {0}")]
    ChannelCreation(String),

    #[error("Insufficient permissions to capture. Try running as root or with CAP_NET_RAW.")]
    InsufficientPermissions,
}

/// Failure to decode one protocol layer.
///
/// Caught at the pipeline stage that produced it and converted into a
/// degraded record; never crosses the pipeline boundary. An unhandled
/// inner protocol is not a failure and is represented by
/// [`crate::domain::TransportLayer::Other`] instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{layer} header truncated: need {expected} bytes, have {actual}")]
    Truncated {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("malformed {layer} {field}: {value}")]
    MalformedField {
        layer: &'static str,
        field: &'static str,
        value: u32,
    },
}
