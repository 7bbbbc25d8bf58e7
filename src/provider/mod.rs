//! External chat-completions provider.
//!
//! [`CompletionProvider`] is the seam between the question adapter and
//! the outside world. [`OpenRouterProvider`] implements it over HTTP;
//! tests substitute their own implementations.

pub mod error;
pub mod openrouter;
pub mod types;

use async_trait::async_trait;

pub use error::ProviderError;
pub use openrouter::OpenRouterProvider;
pub use types::{ChatCompletion, ChatMessage, ChatRequest, Role};

/// A single-attempt chat-completions backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync + std::fmt::Debug {
    /// Sends one completion request and returns the parsed response.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport failure, timeout, a
    /// non-success status, or an undecodable body.
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, ProviderError>;
}
