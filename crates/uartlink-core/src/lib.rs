//! # uartlink Core Library
//!
//! Core functionality for the uartlink serial link manager.

#![warn(missing_docs)]

//!
//! This library provides:
//! - Serial port enumeration and access
//! - A connection manager that streams a configured payload as fixed-size
//!   packets and drains inbound bytes as they arrive
//! - Instantaneous throughput metering on both directions
//! - An optional append-only text log of link activity
//!
//! The library has no UI of its own. A frontend subscribes to [`LinkEvent`]
//! notifications and drives the manager's operations; everything here runs on
//! the caller's thread.
//!
//! ## Example
//!
//! ```rust,ignore
//! use uartlink_core::link::LinkManager;
//!
//! let mut link = LinkManager::new(b"hello over the wire".to_vec());
//! let events = link.subscribe();
//!
//! // Connecting transmits the configured payload immediately.
//! if link.open("/dev/ttyUSB0", 115200) {
//!     while let Ok(event) = events.try_recv() {
//!         println!("{event:?}");
//!     }
//! }
//! ```
//!
//! [`LinkEvent`]: link::LinkEvent

pub mod eventlog;
pub mod link;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::eventlog::EventLog;
    pub use crate::link::{
        LinkError, LinkEvent, LinkManager, LinkState, PortInfo, SerialTransport, Transport,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
