//! Record reporting.
//!
//! Defines the `RecordSink` trait and a console implementation. Sinks
//! only render; filtering and transformation happen upstream in the
//! coordinator.

mod console_reporter;

pub use console_reporter::ConsoleReporter;

use crate::domain::CapturedRecord;

/// Trait for record consumers.
pub trait RecordSink: Send {
    /// Report one captured record.
    fn report(&self, record: &CapturedRecord);

    /// Called when capture starts.
    fn on_start(&self, interface: &str);

    /// Called when capture stops.
    fn on_stop(&self);
}
