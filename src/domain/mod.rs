//! Domain types produced and consumed by the dissection pipeline.

mod layers;
mod record;

pub use layers::{EthernetLayer, NetworkLayer, TcpFlags, TransportLayer};
pub use record::{CapturedRecord, LinkType, RawFrame};
