//! Question answering over the completions provider.

use std::sync::Arc;

use crate::provider::{ChatMessage, ChatRequest, CompletionProvider, ProviderError};

/// Persona fixed for every question.
pub const SYSTEM_PROMPT: &str =
    "Você é um especialista em CS2 e na equipe FURIA. Responda de forma concisa e empolgada!";

/// Answer used when the provider returns no usable text.
pub const FALLBACK_ANSWER: &str = "Não consegui gerar uma resposta.";

/// Sampling temperature sent with every question.
pub const TEMPERATURE: f32 = 0.7;

/// Output bound sent with every question.
pub const MAX_TOKENS: u32 = 256;

/// Why a question could not be answered.
#[derive(Debug, thiserror::Error)]
pub enum AskError {
    /// The question is empty after trimming.
    #[error("question is empty")]
    InvalidInput,

    /// The provider call failed.
    #[error(transparent)]
    UpstreamFailure(#[from] ProviderError),
}

/// Answers questions with one provider call each; no retries, no cache.
#[derive(Debug, Clone)]
pub struct QuestionService {
    provider: Arc<dyn CompletionProvider>,
}

impl QuestionService {
    /// Creates the service over a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Builds the two-turn prompt for a trimmed question.
    #[must_use]
    pub fn build_request(question: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(question)],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// Answers `question`.
    ///
    /// A well-formed provider response without usable text yields
    /// [`FALLBACK_ANSWER`].
    ///
    /// # Errors
    ///
    /// Returns [`AskError::InvalidInput`] for a blank question (the
    /// provider is not called) and [`AskError::UpstreamFailure`] when the
    /// provider call fails.
    pub async fn ask(&self, question: &str) -> Result<String, AskError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AskError::InvalidInput);
        }

        let completion = self
            .provider
            .complete(Self::build_request(question))
            .await?;

        Ok(completion
            .first_text()
            .map_or_else(|| FALLBACK_ANSWER.to_string(), ToString::to_string))
    }
}
