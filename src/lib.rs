//! # fanchat-gateway
//!
//! Fan chat backend with two surfaces on one listening socket:
//!
//! - `POST /api/perguntar-ia` forwards a question to an external
//!   chat-completions provider and relays the answer.
//! - `GET /ws` upgrades to a WebSocket whose frames are rebroadcast,
//!   unchanged, to every other connected client.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── Access gateway (gateway/)   ── HTTP only
//!     │     └── REST Handlers (api/)
//!     │           └── QuestionService (service/)
//!     │                 └── CompletionProvider (provider/) ──► OpenRouter
//!     │
//!     └── WS Handler (ws/)
//!           └── BroadcastRelay (domain/)
//!                 └── ConnectionRegistry (domain/)
//! ```
//!
//! The origin check covers HTTP routes only; WebSocket upgrades are not
//! origin-checked.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod provider;
pub mod server;
pub mod service;
pub mod ws;
