//! Service layer: business logic behind the HTTP handlers.
//!
//! [`QuestionService`] validates a fan's question, asks the completions
//! provider, and maps the outcome to a typed result.

pub mod question_service;

pub use question_service::{AskError, QuestionService};
