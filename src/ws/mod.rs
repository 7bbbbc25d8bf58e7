//! WebSocket layer: upgrade handling and the per-connection relay loop.
//!
//! The endpoint at `/ws` carries opaque chat frames. Every text or binary
//! frame a client sends is rebroadcast unchanged to all other connected
//! clients; there is no envelope, acknowledgement, or sub-protocol.

pub mod connection;
pub mod handler;
