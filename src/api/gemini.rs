use async_trait::async_trait;
use log::debug;

use super::client::{ApiClient, Auth};
use super::models::{GenerateContentRequest, GenerateContentResponse};
use super::{ChatBackend, ProviderKind};
use crate::assistant::conversation::ConversationTurn;
use crate::errors::BackendError;

pub const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const GEMINI_MODEL: &str = "gemini-2.0-flash-lite";

pub struct GeminiBackend {
    client: ApiClient,
    api_key: String,
    endpoint: String,
}

impl GeminiBackend {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: ApiClient::new(),
            api_key: api_key.to_string(),
            endpoint: format!("{}/{}:generateContent", GEMINI_BASE, GEMINI_MODEL),
        }
    }
}

#[async_trait]
impl ChatBackend for GeminiBackend {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn send_turns(&self, history: &[ConversationTurn]) -> Result<String, BackendError> {
        let body = GenerateContentRequest::from_history(history);
        debug!("gemini: sending {} turns as one prompt", history.len());
        let resp: GenerateContentResponse = self
            .client
            .post_json(&self.endpoint, Auth::GoogApiKey(&self.api_key), &body)
            .await?;
        Ok(resp.into_text())
    }
}
