//! OpenAPI document for the HTTP surface.

use utoipa::OpenApi;

use crate::api::dto::{AnswerResponse, QuestionRequest};
use crate::api::handlers::{question, system};
use crate::error::ErrorResponse;

/// Generated OpenAPI description of the HTTP endpoints. The `/ws`
/// channel carries opaque frames and is not described here.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "fanchat-gateway",
        description = "Fan chat relay and CS2 question assistant"
    ),
    paths(question::ask_question, system::health_handler),
    components(schemas(QuestionRequest, AnswerResponse, ErrorResponse, system::HealthResponse)),
    tags(
        (name = "Questions", description = "LLM-backed question answering"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_http_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/perguntar-ia"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(!doc.paths.paths.contains_key("/ws"));
    }
}
