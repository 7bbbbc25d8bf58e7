//! Question endpoint DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /api/perguntar-ia`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuestionRequest {
    /// Free-text question about CS2 or the team. A missing field is
    /// treated like an empty question.
    #[serde(default)]
    pub question: Option<String>,
}

/// Successful response body for `POST /api/perguntar-ia`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnswerResponse {
    /// The model's answer, or a fixed fallback when it produced none.
    pub answer: String,
}
