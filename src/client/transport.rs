use async_trait::async_trait;
use reqwest::Client;

use crate::api::{GiftRequest, GiftResponse, GENERATE_GIFTS_PATH};

use super::ClientError;

/// Raw outcome of one request: the HTTP status and the body, if it decoded
/// as a gift response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: u16,
    pub body: Option<GiftResponse>,
}

#[async_trait]
pub trait GiftApi: Send + Sync {
    async fn generate(&self, request: &GiftRequest) -> Result<ApiReply, ClientError>;
}

pub struct HttpGiftApi {
    client: Client,
    base_url: String,
}

impl HttpGiftApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, GENERATE_GIFTS_PATH)
    }
}

#[async_trait]
impl GiftApi for HttpGiftApi {
    async fn generate(&self, request: &GiftRequest) -> Result<ApiReply, ClientError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(ApiReply {
            status,
            body: serde_json::from_slice(&bytes).ok(),
        })
    }
}
