//! Request and response shapes of the chat-completions API.
//!
//! Only the fields the gateway reads are modelled; unknown fields in
//! provider responses are ignored.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that fix the assistant's persona.
    System,
    /// End-user input.
    User,
    /// Model output.
    Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Builds a system turn.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Builds a user turn.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Provider-independent completion request. The provider adds its own
/// model identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Conversation turns, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
}

/// A completion response. A response with no choices is still well formed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatCompletion {
    /// Alternatives returned by the model.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One completion alternative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Choice {
    /// Generated message, if any.
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// Message payload of a [`Choice`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text, if any.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Builds a single-choice completion carrying `text`.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(ChoiceMessage {
                    content: Some(text.into()),
                }),
            }],
        }
    }

    /// Returns the first choice's text when it is present and non-empty.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChatCompletion {
        let Ok(completion) = serde_json::from_str(json) else {
            panic!("failed to parse {json}");
        };
        completion
    }

    #[test]
    fn first_text_from_standard_response() {
        let completion = parse(
            r#"{"id":"gen-1","choices":[{"index":0,"message":{"role":"assistant","content":"FalleN!"},"finish_reason":"stop"}]}"#,
        );
        assert_eq!(completion.first_text(), Some("FalleN!"));
    }

    #[test]
    fn missing_or_empty_choices_yield_none() {
        assert_eq!(parse("{}").first_text(), None);
        assert_eq!(parse(r#"{"choices":[]}"#).first_text(), None);
        assert_eq!(parse(r#"{"choices":[{}]}"#).first_text(), None);
        assert_eq!(
            parse(r#"{"choices":[{"message":{"role":"assistant","content":""}}]}"#).first_text(),
            None
        );
        assert_eq!(
            parse(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).first_text(),
            None
        );
    }

    #[test]
    fn only_the_first_choice_counts() {
        let completion = parse(
            r#"{"choices":[{"message":{"content":"one"}},{"message":{"content":"two"}}]}"#,
        );
        assert_eq!(completion.first_text(), Some("one"));
    }

    #[test]
    fn messages_serialize_with_lowercase_roles() {
        let json = serde_json::to_value(ChatMessage::system("persona")).unwrap_or_default();
        assert_eq!(json, serde_json::json!({"role": "system", "content": "persona"}));
    }
}
