//! Domain layer: connections, the connection registry, and the relay.
//!
//! This module holds everything with persistent in-process state: the set
//! of live WebSocket connections and the fan-out that rebroadcasts a
//! payload from one connection to all the others.

pub mod connection;
pub mod connection_id;
pub mod connection_registry;
pub mod relay;

pub use connection::{Connection, ConnectionState, DeliveryError, Payload};
pub use connection_id::ConnectionId;
pub use connection_registry::{ConnectionRegistry, RegistryError};
pub use relay::{BroadcastRelay, RelayOutcome};
