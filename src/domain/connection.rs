//! A single live WebSocket connection as seen by the relay.
//!
//! [`Connection`] is a cheap, cloneable handle. Clones share one liveness
//! state and one bounded outbound queue; the socket loop that owns the
//! receiving half of that queue is the only writer to the transport.
//! Equality is reference identity, so two handles are equal exactly when
//! they were cloned from the same connection.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use axum::body::Bytes;
use axum::extract::ws::{Message, Utf8Bytes};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Notify, mpsc};

use super::ConnectionId;

/// Liveness of a connection.
///
/// Transitions only move forward:
/// `Connecting → Open → Closing → Closed` (`Closed` is reachable from any state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Upgrade handshake not finished yet.
    Connecting,
    /// Registered and eligible for deliveries.
    Open,
    /// Removed from the registry; the socket loop is winding down.
    Closing,
    /// Transport is gone.
    Closed,
}

impl ConnectionState {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Connecting => 0,
            Self::Open => 1,
            Self::Closing => 2,
            Self::Closed => 3,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// An opaque chat payload, kept in the frame type it arrived in.
///
/// Cloning is cheap (reference-counted buffers), so the relay hands every
/// target its own clone without copying the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A text frame.
    Text(Utf8Bytes),
    /// A binary frame.
    Binary(Bytes),
}

impl Payload {
    /// Extracts the relayable payload from a WebSocket frame.
    ///
    /// Control frames (ping, pong, close) carry nothing to relay and
    /// yield `None`.
    #[must_use]
    pub fn from_message(message: Message) -> Option<Self> {
        match message {
            Message::Text(text) => Some(Self::Text(text)),
            Message::Binary(bytes) => Some(Self::Binary(bytes)),
            Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
        }
    }

    /// Converts the payload back into a frame of the same type.
    #[must_use]
    pub fn into_message(self) -> Message {
        match self {
            Self::Text(text) => Message::Text(text),
            Self::Binary(bytes) => Message::Binary(bytes),
        }
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.as_str().len(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Returns `true` for a zero-length payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frame kind, for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Binary(_) => "binary",
        }
    }
}

/// Why a single delivery attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    /// The target is not in the `Open` state.
    #[error("connection is {0}, not open")]
    NotOpen(ConnectionState),

    /// The target's outbound queue cannot take the payload right now.
    #[error("outbound queue is full")]
    Saturated,

    /// The target's socket loop has exited.
    #[error("connection writer has gone away")]
    Disconnected,
}

impl DeliveryError {
    /// Returns `true` when the target can never accept another payload and
    /// should be dropped from the registry.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Saturated)
    }
}

#[derive(Debug)]
struct ConnectionInner {
    id: ConnectionId,
    state: AtomicU8,
    outbound: mpsc::Sender<Payload>,
    closing: Notify,
}

/// Handle to one WebSocket connection.
#[derive(Debug, Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

impl Connection {
    /// Creates a connection in the `Connecting` state together with the
    /// receiving half of its outbound queue.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(outbound_capacity: usize) -> (Self, mpsc::Receiver<Payload>) {
        let (outbound, rx) = mpsc::channel(outbound_capacity.max(1));
        let inner = ConnectionInner {
            id: ConnectionId::new(),
            state: AtomicU8::new(ConnectionState::Connecting.as_u8()),
            outbound,
            closing: Notify::new(),
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            rx,
        )
    }

    /// Returns the internal identifier.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.inner.id
    }

    /// Returns the current liveness state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    /// Returns `true` while the connection is `Open`.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Moves `Connecting → Open`. Returns `false` if the connection was in
    /// any other state.
    pub fn mark_open(&self) -> bool {
        self.transition(ConnectionState::Connecting, ConnectionState::Open)
    }

    /// Moves `Open → Closing` and wakes the socket loop. Returns `false`
    /// if the connection was not open.
    pub(crate) fn begin_close(&self) -> bool {
        let moved = self.transition(ConnectionState::Open, ConnectionState::Closing);
        if moved {
            self.inner.closing.notify_one();
        }
        moved
    }

    /// Marks the connection `Closed` from any state.
    pub fn mark_closed(&self) {
        let previous = self
            .inner
            .state
            .swap(ConnectionState::Closed.as_u8(), Ordering::AcqRel);
        if previous != ConnectionState::Closed.as_u8() {
            self.inner.closing.notify_one();
        }
    }

    /// Resolves once the connection has been asked to close, either by the
    /// registry or because its transport failed.
    pub async fn closing(&self) {
        self.inner.closing.notified().await;
    }

    /// Hands `payload` to the connection's outbound queue without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::NotOpen`] if the connection is not open,
    /// [`DeliveryError::Saturated`] if its queue is full, and
    /// [`DeliveryError::Disconnected`] if its socket loop is gone (the
    /// connection is then marked `Closed`).
    pub fn try_deliver(&self, payload: Payload) -> Result<(), DeliveryError> {
        let state = self.state();
        if state != ConnectionState::Open {
            return Err(DeliveryError::NotOpen(state));
        }
        match self.inner.outbound.try_send(payload) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DeliveryError::Saturated),
            Err(TrySendError::Closed(_)) => {
                self.mark_closed();
                Err(DeliveryError::Disconnected)
            }
        }
    }

    fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        self.inner
            .state
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Connection {}
