//! Question endpoint: relays a fan's question to the model provider.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{AnswerResponse, QuestionRequest};
use crate::app_state::AppState;
use crate::config::Environment;
use crate::error::{ErrorResponse, GatewayError};
use crate::service::AskError;

/// `POST /api/perguntar-ia` — Ask the CS2/FURIA assistant a question.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidInput`] for a missing, blank, or
/// unparsable question and [`GatewayError::UpstreamFailure`] when the
/// provider call fails.
#[utoipa::path(
    post,
    path = "/api/perguntar-ia",
    tag = "Questions",
    summary = "Ask the assistant",
    description = "Forwards the trimmed question to the model provider with a fixed persona and returns the first completion.",
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Answer generated", body = AnswerResponse),
        (status = 400, description = "Missing or blank question", body = ErrorResponse),
        (status = 403, description = "Origin not allowed", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    )
)]
pub async fn ask_question(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, GatewayError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "unreadable question body");
        GatewayError::InvalidInput(rejection.body_text())
    })?;
    let question = request.question.unwrap_or_default();

    let answer = state
        .question_service
        .ask(&question)
        .await
        .map_err(|err| to_gateway_error(err, state.environment))?;

    Ok(Json(AnswerResponse { answer }))
}

/// Maps an adapter failure to the HTTP contract. Provider detail is kept
/// out of production responses.
fn to_gateway_error(err: AskError, environment: Environment) -> GatewayError {
    match err {
        AskError::InvalidInput => GatewayError::InvalidInput("question is empty".to_string()),
        AskError::UpstreamFailure(source) => {
            tracing::error!(error = %source, "question provider call failed");
            GatewayError::UpstreamFailure {
                details: (!environment.is_production()).then(|| source.to_string()),
            }
        }
    }
}

/// Question routes, nested under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/perguntar-ia", post(ask_question))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    #[test]
    fn upstream_details_hidden_in_production() {
        let err = to_gateway_error(
            AskError::UpstreamFailure(ProviderError::Timeout),
            Environment::Production,
        );
        assert!(matches!(err, GatewayError::UpstreamFailure { details: None }));
    }

    #[test]
    fn upstream_details_shown_in_development() {
        let err = to_gateway_error(
            AskError::UpstreamFailure(ProviderError::Timeout),
            Environment::Development,
        );
        let GatewayError::UpstreamFailure { details: Some(details) } = err else {
            panic!("expected details in development");
        };
        assert!(details.contains("timed out"));
    }

    #[test]
    fn blank_question_is_invalid_input() {
        let err = to_gateway_error(AskError::InvalidInput, Environment::Production);
        assert!(matches!(err, GatewayError::InvalidInput(_)));
    }
}
