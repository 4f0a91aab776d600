pub mod client;
pub mod gemini;
pub mod models;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::assistant::conversation::ConversationTurn;
use crate::errors::BackendError;

/// Hosted chat-completion providers the assistant can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::OpenAi, ProviderKind::Gemini];

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI (GPT)",
            ProviderKind::Gemini => "Google Gemini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One capability: turn a conversation history into a reply.
///
/// An empty string means the provider answered without content; the caller
/// decides what to show in that case.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn send_turns(&self, history: &[ConversationTurn]) -> Result<String, BackendError>;
}

/// Builds a backend for a provider and API key.
pub type BackendFactory = Arc<dyn Fn(ProviderKind, &str) -> Box<dyn ChatBackend> + Send + Sync>;

/// Factory wired to the real HTTP backends.
pub fn http_backend_factory() -> BackendFactory {
    Arc::new(|kind: ProviderKind, api_key: &str| -> Box<dyn ChatBackend> {
        match kind {
            ProviderKind::OpenAi => Box::new(openai::OpenAiBackend::new(api_key)),
            ProviderKind::Gemini => Box::new(gemini::GeminiBackend::new(api_key)),
        }
    })
}
