use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::api::GiftResponse;

pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred during your request.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("OpenAI API key not configured, please follow instructions in README.md")]
    MissingApiKey,
    #[error("Please enter valid gift parameters")]
    InvalidPrompt,
    /// Structured failure from the completion service. `body` is `None` when
    /// upstream bodies are not relayed to clients.
    #[error("completion service returned {status}")]
    Upstream { status: StatusCode, body: Option<Value> },
    #[error("An error occurred during your request.")]
    Completion(String),
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingApiKey | Self::Completion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidPrompt => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::MethodNotAllowed => (
                status,
                [(header::ALLOW, "POST")],
                Json(GiftResponse::failure(self.to_string())),
            )
                .into_response(),
            Self::Upstream { body: Some(body), .. } => (status, Json(body)).into_response(),
            Self::Upstream { body: None, .. } | Self::Completion(_) => {
                (status, Json(GiftResponse::failure(GENERIC_FAILURE_MESSAGE))).into_response()
            }
            other => (status, Json(GiftResponse::failure(other.to_string()))).into_response(),
        }
    }
}
