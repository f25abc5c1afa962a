//! Serial Link Management
//!
//! Owns a single duplex serial connection, streams the configured payload as
//! fixed-size packets with per-packet throughput metering, and drains inbound
//! bytes with per-batch metering. All activity is surfaced through
//! [`LinkEvent`] notifications.

mod error;
mod event;
mod manager;
pub mod meter;
pub mod serial;
mod transport;

pub use error::LinkError;
pub use event::LinkEvent;
pub use manager::{LinkManager, LinkState};
pub use serial::{list_ports, open_port, PortInfo};
pub use transport::{SerialTransport, Transport};

/// Default baud rate for newly configured links
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Number of payload bytes written per transport write
pub const PACKET_SIZE: usize = 32;
