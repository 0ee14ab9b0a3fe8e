use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::{
    completion::{CompletionError, CompletionRequest},
    error::ApiError,
    prompt::{generate_prompt, SYSTEM_INSTRUCTION},
    AppState,
};

use super::models::{GiftRequest, GiftResponse};

pub const NO_SUGGESTIONS: &str = "No suggestions available.";

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn generate_gifts(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Json<GiftResponse>, ApiError> {
    if method != Method::POST {
        tracing::warn!(%method, "rejected non-POST request to generate-gifts");
        return Err(ApiError::MethodNotAllowed);
    }

    let request = GiftRequest::from_body(&body);
    let prompt = generate_prompt(&request);

    let Some(completion) = state.completion.as_ref() else {
        tracing::error!("OPENAI_API_KEY is not configured");
        return Err(ApiError::MissingApiKey);
    };

    if prompt.trim().is_empty() {
        tracing::info!(?request, "gift parameters produced an empty prompt");
        return Err(ApiError::InvalidPrompt);
    }

    let completion_request = CompletionRequest {
        model: state.config.openai_model.clone(),
        system: SYSTEM_INSTRUCTION.to_string(),
        user: prompt,
        temperature: state.config.temperature,
        max_tokens: state.config.max_tokens,
    };

    match completion.complete(&completion_request).await {
        Ok(answer) => {
            let result = answer.first_text().unwrap_or(NO_SUGGESTIONS).to_string();
            Ok(Json(GiftResponse::success(result)))
        }
        Err(CompletionError::Upstream { status, body }) => {
            tracing::error!(%status, %body, "completion service returned an error");
            let body = state.config.forward_upstream_errors.then_some(body);
            Err(ApiError::Upstream { status, body })
        }
        Err(err) => {
            tracing::error!(error = %err, "error with completion request");
            Err(ApiError::Completion(err.to_string()))
        }
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn not_found() -> Response {
    ApiError::NotFound.into_response()
}
