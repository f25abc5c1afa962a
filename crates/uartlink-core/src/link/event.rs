//! Link event notifications
//!
//! One-way, fire-and-forget notifications a frontend subscribes to. Events
//! are queued synchronously, in order, before the operation that produced
//! them returns; subscribers drain their receiver whenever convenient.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Notification emitted by the link manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkEvent {
    /// The link was opened (`true`) or closed (`false`)
    ConnectionChanged(bool),

    /// Instantaneous transmit rate in bits per second, one sample per packet
    SendRate(f64),

    /// Instantaneous receive rate in bits per second, one sample per inbound
    /// batch
    ReceiveRate(f64),

    /// Human-readable activity line (UTF-8). Carries both "Sent data" and
    /// "Received data" text so a single console can interleave the two
    /// directions.
    Line(Vec<u8>),

    /// A full send pass over the configured payload finished
    SendComplete,
}

/// Subscriber registry with synchronous in-order fan-out.
#[derive(Default)]
pub(crate) struct Subscribers {
    senders: Vec<Sender<LinkEvent>>,
}

impl Subscribers {
    /// Register a new subscriber and hand back its receiving end.
    pub fn subscribe(&mut self) -> Receiver<LinkEvent> {
        let (tx, rx) = channel();
        self.senders.push(tx);
        rx
    }

    /// Deliver an event to every live subscriber, dropping the ones that
    /// have gone away.
    pub fn emit(&mut self, event: LinkEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
