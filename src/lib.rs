pub mod api;
pub mod client;
pub mod completion;
pub mod config;
pub mod error;
pub mod prompt;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::completion::{CompletionService, OpenAiCompletionService};
use crate::config::AppConfig;

pub use api::{Gender, GiftRequest, GiftResponse};
pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when no API key is configured.
    pub completion: Option<Arc<dyn CompletionService>>,
}

impl AppState {
    pub fn new(config: AppConfig, completion: Option<Arc<dyn CompletionService>>) -> Self {
        Self {
            config: Arc::new(config),
            completion,
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let completion = OpenAiCompletionService::from_config(&config)
            .map(|service| Arc::new(service) as Arc<dyn CompletionService>);
        Self::new(config, completion)
    }
}

pub fn build_app(state: AppState) -> Router {
    api::router(state).layer(TraceLayer::new_for_http())
}

pub async fn run_server(app: Router, host: &str, port: u16) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "gift ideas service listening");
    axum::serve(listener, app).await
}
