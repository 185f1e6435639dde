//! Console-based record sink.

use std::io::{self, Write};

use crate::domain::CapturedRecord;
use crate::reporter::RecordSink;

/// Prints captured records to stdout, one line per record with an
/// optional indented payload block.
pub struct ConsoleReporter {
    /// Whether to show full-date timestamps and payload blocks for
    /// every record
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable or disable verbose output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn format_record(&self, record: &CapturedRecord) -> String {
        let timestamp = if self.verbose {
            record.timestamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
        } else {
            record.timestamp.format("%H:%M:%S%.3f").to_string()
        };

        format!(
            "{} {} -> {} | {} | {} bytes | {}",
            timestamp,
            record.source,
            record.destination,
            record.protocol,
            record.length,
            record.info
        )
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for ConsoleReporter {
    fn report(&self, record: &CapturedRecord) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", self.format_record(record));

        if record.show_payload || self.verbose {
            for line in record.payload.lines() {
                let _ = writeln!(stdout, "    {}", line);
            }
        }
    }

    fn on_start(&self, interface: &str) {
        println!("Capturing on interface: {}", interface);
        println!("Press Ctrl+C to stop.\n");
    }

    fn on_stop(&self) {
        println!("\nCapture stopped.");
    }
}
