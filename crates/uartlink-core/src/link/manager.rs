//! Link connection management
//!
//! Owns the transport lifecycle, the pending payload, the event log, and the
//! subscriber registry. Everything runs on the caller's thread: sends block
//! per packet until the bytes leave the device, and inbound draining is
//! driven by the caller's availability polling.

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Receiver;
use std::time::Instant;

use super::event::Subscribers;
use super::{meter, serial, LinkEvent, SerialTransport, Transport, PACKET_SIZE};
use crate::eventlog::EventLog;

/// Connection state of the link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkState {
    /// No transport is open
    Closed,
    /// A transport is open on the named port
    Open {
        /// Port name the link was opened on
        port_name: String,
        /// Bit rate the link was opened at
        baud_rate: u32,
    },
}

/// Serial link manager.
///
/// At most one transport is open at a time; opening a new one implicitly
/// replaces the old. The pending payload is transmitted in full on every
/// [`send_payload`](LinkManager::send_payload) pass and immediately after a
/// successful open.
pub struct LinkManager {
    transport: Option<Box<dyn Transport>>,
    state: LinkState,
    payload: Vec<u8>,
    event_log: EventLog,
    subscribers: Subscribers,
    /// Receive interval baseline. Started lazily on the first inbound poll
    /// and restarted after every drained batch. Deliberately NOT reset when
    /// the link is reopened, so the first batch after a reconnect is metered
    /// against the previous session's baseline.
    receive_mark: Option<Instant>,
    tx_bytes: u64,
    rx_bytes: u64,
    tx_packets: u64,
    rx_packets: u64,
}

impl LinkManager {
    /// Create a closed manager with the payload that will be transmitted on
    /// connect and on every send pass.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            transport: None,
            state: LinkState::Closed,
            payload,
            event_log: EventLog::new(),
            subscribers: Subscribers::default(),
            receive_mark: None,
            tx_bytes: 0,
            rx_bytes: 0,
            tx_packets: 0,
            rx_packets: 0,
        }
    }

    /// Register an event subscriber.
    pub fn subscribe(&mut self) -> Receiver<LinkEvent> {
        self.subscribers.subscribe()
    }

    /// Current connection state.
    pub fn state(&self) -> &LinkState {
        &self.state
    }

    /// Whether a transport is currently open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Replace the pending payload. No validation; an empty payload is legal
    /// and produces an empty send pass.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }

    /// The currently configured payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Cumulative `(tx_bytes, rx_bytes, tx_packets, rx_packets)` counters.
    pub fn counters(&self) -> (u64, u64, u64, u64) {
        (self.tx_bytes, self.rx_bytes, self.tx_packets, self.rx_packets)
    }

    /// Open the named serial port at `baud_rate` (8N1, no flow control) and
    /// make it the active transport. Any previously open transport is closed
    /// first, without an event. On success a `ConnectionChanged(true)`
    /// notification fires and the pending payload is transmitted immediately.
    /// On failure the link stays closed and `ConnectionChanged(false)` fires.
    pub fn open(&mut self, port_name: &str, baud_rate: u32) -> bool {
        self.drop_transport();

        match serial::open_port(port_name, baud_rate) {
            Ok(port) => {
                let transport = Box::new(SerialTransport::new(port, baud_rate));
                self.install(transport, port_name, baud_rate);
                true
            }
            Err(e) => {
                tracing::warn!(port = port_name, error = %e, "failed to open link");
                self.subscribers.emit(LinkEvent::ConnectionChanged(false));
                false
            }
        }
    }

    /// Open the link over a caller-supplied transport (a network bridge, a
    /// loopback, a test double). Behaves like a successful [`open`]: replaces
    /// any active transport, fires `ConnectionChanged(true)`, and transmits
    /// the pending payload.
    ///
    /// [`open`]: LinkManager::open
    pub fn open_with(&mut self, transport: Box<dyn Transport>, port_name: &str, baud_rate: u32) {
        self.drop_transport();
        self.install(transport, port_name, baud_rate);
    }

    /// Close the link. No-op (and no event) when already closed. The event
    /// log is left untouched.
    pub fn close(&mut self) {
        if self.transport.is_none() {
            return;
        }
        self.drop_transport();
        self.subscribers.emit(LinkEvent::ConnectionChanged(false));
    }

    /// Transmit the pending payload as consecutive packets of at most
    /// [`PACKET_SIZE`] bytes. No-op when the link is closed.
    ///
    /// Each packet write blocks until transmission completes, then a
    /// [`LinkEvent::SendRate`] sample and a [`LinkEvent::Line`] with the
    /// packet text are emitted and the line is appended to the event log.
    /// A write error degrades that packet to a zero-byte sample; the pass
    /// still runs to completion. One [`LinkEvent::SendComplete`] follows the
    /// last packet (or fires alone for an empty payload).
    pub fn send_payload(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };

        let payload = self.payload.clone();
        for packet in payload.chunks(PACKET_SIZE) {
            let started = Instant::now();
            let written = match transport.write_blocking(packet) {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(len = packet.len(), error = %e, "packet write failed");
                    0
                }
            };
            let rate = meter::bits_per_second(written as u64, started.elapsed());
            self.tx_bytes = self.tx_bytes.saturating_add(written as u64);
            self.tx_packets = self.tx_packets.saturating_add(1);

            self.subscribers.emit(LinkEvent::SendRate(rate));

            let line = format!(
                "Sent data: {} - Speed: {:.2} bps",
                String::from_utf8_lossy(packet),
                rate
            );
            self.subscribers.emit(LinkEvent::Line(line.as_bytes().to_vec()));
            self.event_log.append(&line);
        }
        self.transport = Some(transport);

        self.subscribers.emit(LinkEvent::SendComplete);
    }

    /// Drain whatever inbound bytes are currently buffered. Call whenever the
    /// transport signals data availability; must not run concurrently with
    /// itself or with [`send_payload`](LinkManager::send_payload).
    ///
    /// An empty drain is a no-op: no events, and the receive baseline is left
    /// running. A nonempty drain emits a [`LinkEvent::ReceiveRate`] sample
    /// metered since the previous batch, a [`LinkEvent::Line`] with the
    /// received text, appends to the event log, and restarts the baseline.
    pub fn poll_incoming(&mut self) {
        let Some(mut transport) = self.transport.take() else {
            return;
        };

        let mark = *self.receive_mark.get_or_insert_with(Instant::now);

        let data = match transport.read_available() {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "inbound drain failed");
                Vec::new()
            }
        };
        self.transport = Some(transport);

        if data.is_empty() {
            return;
        }

        let rate = meter::bits_per_second(data.len() as u64, mark.elapsed());
        self.rx_bytes = self.rx_bytes.saturating_add(data.len() as u64);
        self.rx_packets = self.rx_packets.saturating_add(1);

        self.subscribers.emit(LinkEvent::ReceiveRate(rate));

        let line = format!(
            "Received data: {} - Speed: {:.2} bps",
            String::from_utf8_lossy(&data),
            rate
        );
        self.subscribers.emit(LinkEvent::Line(line.as_bytes().to_vec()));
        self.event_log.append(&line);

        self.receive_mark = Some(Instant::now());
    }

    /// Start logging link activity to the file at `path`, replacing any
    /// previously configured log. Returns `false` (logging disabled) if the
    /// file cannot be created.
    pub fn open_log<P: AsRef<std::path::Path>>(&mut self, path: P) -> bool {
        self.event_log.open(path)
    }

    /// Stop logging and close the log file. Idempotent.
    pub fn close_log(&mut self) {
        self.event_log.close();
    }

    /// Whether link activity is currently written to a log file.
    pub fn is_logging(&self) -> bool {
        self.event_log.is_enabled()
    }

    fn install(&mut self, transport: Box<dyn Transport>, port_name: &str, baud_rate: u32) {
        self.transport = Some(transport);
        self.state = LinkState::Open {
            port_name: port_name.to_string(),
            baud_rate,
        };
        self.subscribers.emit(LinkEvent::ConnectionChanged(true));
        // Connecting implies an immediate transmission of the pending payload.
        self.send_payload();
    }

    fn drop_transport(&mut self) {
        self.transport = None;
        self.state = LinkState::Closed;
    }
}
