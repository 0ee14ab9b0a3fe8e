mod handlers;
mod models;

use axum::{
    routing::{any, get},
    Router,
};

use crate::AppState;

pub use handlers::{generate_gifts, index, not_found, NO_SUGGESTIONS};
pub use models::{ErrorMessage, Gender, GiftRequest, GiftResponse};

pub const GENERATE_GIFTS_PATH: &str = "/api/generate-gifts";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(GENERATE_GIFTS_PATH, any(generate_gifts))
        .fallback(not_found)
        .with_state(state)
}
