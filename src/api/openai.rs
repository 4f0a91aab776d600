use async_trait::async_trait;
use log::debug;

use super::client::{ApiClient, Auth};
use super::models::{ChatCompletionRequest, ChatCompletionResponse};
use super::{ChatBackend, ProviderKind};
use crate::assistant::conversation::ConversationTurn;
use crate::errors::BackendError;

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";

pub struct OpenAiBackend {
    client: ApiClient,
    api_key: String,
    endpoint: String,
}

impl OpenAiBackend {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: ApiClient::new(),
            api_key: api_key.to_string(),
            endpoint: OPENAI_ENDPOINT.to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn send_turns(&self, history: &[ConversationTurn]) -> Result<String, BackendError> {
        let body = ChatCompletionRequest::from_history(OPENAI_MODEL, history);
        debug!("openai: sending {} turns", history.len());
        let resp: ChatCompletionResponse = self
            .client
            .post_json(&self.endpoint, Auth::Bearer(&self.api_key), &body)
            .await?;
        Ok(resp.into_text())
    }
}
