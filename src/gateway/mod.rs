//! Access gateway: origin-based admission control for the HTTP API.
//!
//! Every HTTP route is wrapped by [`enforce_origin`], which rejects
//! requests from browser origins outside the allow-list before routing
//! reaches a handler, and by [`cors_layer`], which emits CORS headers
//! for the allowed ones. The `/ws` upgrade route is deliberately left
//! outside both layers.

pub mod origin;

pub use origin::{OriginPolicy, cors_layer, enforce_origin};
