use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api::{BackendFactory, ChatBackend, ProviderKind};
use crate::assistant::conversation::{Conversation, ConversationTurn};
use crate::errors::{AssistantError, Result};
use crate::storage::{ConfigStore, ProviderConfig};
use crate::utils::mask_secret;

pub const EMPTY_REPLY_FALLBACK: &str = "Désolé, je n'ai pas pu générer une réponse.";

/// Holds the selected provider, its backend and the conversation history.
pub struct AssistantService {
    store: Arc<dyn ConfigStore>,
    factory: BackendFactory,
    backend: Option<Box<dyn ChatBackend>>,
    provider: ProviderKind,
    conversation: Conversation,
}

impl AssistantService {
    /// Builds the service and applies any config already in `store`.
    pub fn new(store: Arc<dyn ConfigStore>, factory: BackendFactory) -> Self {
        let mut service = Self {
            store,
            factory,
            backend: None,
            provider: ProviderKind::default(),
            conversation: Conversation::new(),
        };
        match service.store.load() {
            Ok(Some(config)) if !config.api_key.trim().is_empty() => {
                service.install(config.provider, &config.api_key);
                info!("Restored assistant provider {}", config.provider);
            }
            Ok(_) => debug!("No saved assistant provider"),
            Err(e) => warn!("Ignoring unreadable assistant config: {}", e),
        }
        service
    }

    fn install(&mut self, provider: ProviderKind, api_key: &str) {
        self.provider = provider;
        self.conversation.clear();
        self.backend = Some((self.factory)(provider, api_key));
    }

    /// Switch provider. History is discarded and the config persisted.
    ///
    /// `Err(Config)` means the switch happened in memory but could not be
    /// written to disk.
    pub fn set_provider(&mut self, provider: ProviderKind, api_key: &str) -> Result<()> {
        if api_key.trim().is_empty() {
            return Err(AssistantError::EmptyApiKey);
        }
        self.install(provider, api_key);
        info!("Assistant provider set to {} (key {})", provider, mask_secret(api_key));
        let config = ProviderConfig { provider, api_key: api_key.to_string() };
        self.store.save(&config).map_err(|e| {
            error!("Failed to save assistant config: {}", e);
            AssistantError::Config(e)
        })
    }

    /// Send one user message with the whole history as context.
    ///
    /// A failed request keeps the user turn in history.
    pub async fn send_message(&mut self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(AssistantError::EmptyInput);
        }
        let Some(backend) = self.backend.as_ref() else {
            return Err(AssistantError::NotConfigured);
        };

        self.conversation.push(ConversationTurn::user(text));
        let reply = match backend.send_turns(self.conversation.turns()).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("{} request failed: {}", self.provider, e);
                return Err(AssistantError::RequestFailed(e));
            }
        };

        let reply = if reply.trim().is_empty() { EMPTY_REPLY_FALLBACK.to_string() } else { reply };
        self.conversation.push(ConversationTurn::assistant(reply.clone()));
        Ok(reply)
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn current_provider(&self) -> ProviderKind {
        self.provider
    }

    pub fn history(&self) -> &[ConversationTurn] {
        self.conversation.turns()
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }
}

/// Shared, single-slot access to the assistant.
///
/// At most one caller holds the service at a time. A send started while
/// another is outstanding is rejected with `Busy` instead of queued.
#[derive(Clone)]
pub struct AssistantHandle {
    inner: Arc<Mutex<AssistantService>>,
}

/// A reserved send. Dropping it without running releases the slot.
pub struct PendingSend {
    guard: OwnedMutexGuard<AssistantService>,
    text: String,
}

impl PendingSend {
    pub async fn run(mut self) -> Result<String> {
        self.guard.send_message(&self.text).await
    }
}

impl AssistantHandle {
    pub fn new(service: AssistantService) -> Self {
        Self { inner: Arc::new(Mutex::new(service)) }
    }

    pub fn begin_send(&self, text: impl Into<String>) -> Result<PendingSend> {
        let guard = self.inner.clone().try_lock_owned().map_err(|_| AssistantError::Busy)?;
        Ok(PendingSend { guard, text: text.into() })
    }

    /// Run `f` against the service unless a send holds it.
    pub fn try_with<R>(&self, f: impl FnOnce(&mut AssistantService) -> R) -> Result<R> {
        let mut guard = self.inner.try_lock().map_err(|_| AssistantError::Busy)?;
        Ok(f(&mut guard))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::{BackendError, ConfigError, FailureKind};
    use crate::storage::MemoryConfigStore;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Backend that replays canned results and records what it was sent.
    #[derive(Clone, Default)]
    pub(crate) struct Script {
        pub replies: Arc<StdMutex<VecDeque<std::result::Result<String, BackendError>>>>,
        pub calls: Arc<AtomicUsize>,
        pub seen: Arc<StdMutex<Vec<Vec<ConversationTurn>>>>,
        pub keys: Arc<StdMutex<Vec<(ProviderKind, String)>>>,
        pub gate: Option<(Arc<Notify>, Arc<Notify>)>,
    }

    impl Script {
        pub fn reply(self, text: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.to_string()));
            self
        }

        pub fn fail(self, err: BackendError) -> Self {
            self.replies.lock().unwrap().push_back(Err(err));
            self
        }

        pub fn factory(&self) -> BackendFactory {
            let script = self.clone();
            Arc::new(move |kind: ProviderKind, key: &str| -> Box<dyn ChatBackend> {
                script.keys.lock().unwrap().push((kind, key.to_string()));
                Box::new(ScriptedBackend { kind, script: script.clone() })
            })
        }
    }

    struct ScriptedBackend {
        kind: ProviderKind,
        script: Script,
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn send_turns(
            &self,
            history: &[ConversationTurn],
        ) -> std::result::Result<String, BackendError> {
            self.script.calls.fetch_add(1, Ordering::SeqCst);
            self.script.seen.lock().unwrap().push(history.to_vec());
            if let Some((entered, release)) = &self.script.gate {
                entered.notify_one();
                release.notified().await;
            }
            let next = self.script.replies.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn service_with(script: &Script, store: &MemoryConfigStore) -> AssistantService {
        AssistantService::new(Arc::new(store.clone()), script.factory())
    }

    #[test]
    fn empty_api_key_is_rejected_without_side_effects() {
        let script = Script::default();
        let store = MemoryConfigStore::new();
        let mut service = service_with(&script, &store);
        assert!(matches!(
            service.set_provider(ProviderKind::OpenAi, "   "),
            Err(AssistantError::EmptyApiKey)
        ));
        assert!(!service.is_configured());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn set_provider_configures_and_clears_history() {
        let script = Script::default().reply("Bonjour !");
        let store = MemoryConfigStore::new();
        let mut service = service_with(&script, &store);
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap();
        service.send_message("Bonjour").await.unwrap();
        assert_eq!(service.history().len(), 2);

        service.set_provider(ProviderKind::Gemini, "AIza-2").unwrap();
        assert!(service.is_configured());
        assert!(service.history().is_empty());
        assert_eq!(service.current_provider(), ProviderKind::Gemini);
        assert_eq!(
            store.load().unwrap(),
            Some(ProviderConfig { provider: ProviderKind::Gemini, api_key: "AIza-2".into() })
        );
    }

    #[tokio::test]
    async fn blank_message_never_reaches_the_backend() {
        let script = Script::default();
        let mut service = service_with(&script, &MemoryConfigStore::new());
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap();
        for text in ["", "   ", "\n\t"] {
            assert!(matches!(service.send_message(text).await, Err(AssistantError::EmptyInput)));
        }
        assert!(service.history().is_empty());
        assert_eq!(script.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unconfigured_send_leaves_history_alone() {
        let script = Script::default();
        let mut service = service_with(&script, &MemoryConfigStore::new());
        assert!(matches!(service.send_message("Bonjour").await, Err(AssistantError::NotConfigured)));
        assert!(service.history().is_empty());
    }

    #[tokio::test]
    async fn each_request_carries_the_whole_history() {
        let script = Script::default().reply("Oui.").reply("Non.");
        let mut service = service_with(&script, &MemoryConfigStore::new());
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap();
        assert_eq!(service.send_message("Première").await.unwrap(), "Oui.");
        assert_eq!(service.send_message("Seconde").await.unwrap(), "Non.");

        let seen = script.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 1);
        assert_eq!(seen[1].len(), 3);
        assert_eq!(seen[1][1], ConversationTurn::assistant("Oui."));
    }

    #[tokio::test]
    async fn empty_reply_becomes_the_fallback() {
        let script = Script::default().reply("  ");
        let mut service = service_with(&script, &MemoryConfigStore::new());
        service.set_provider(ProviderKind::Gemini, "k").unwrap();
        assert_eq!(service.send_message("Allô").await.unwrap(), EMPTY_REPLY_FALLBACK);
        assert_eq!(service.history()[1].content, EMPTY_REPLY_FALLBACK);
    }

    #[tokio::test]
    async fn failed_request_keeps_the_user_turn() {
        let script = Script::default()
            .fail(BackendError::Status { status: 429, body: "Too Many Requests".into() })
            .reply("Enfin.");
        let mut service = service_with(&script, &MemoryConfigStore::new());
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap();

        let err = service.send_message("Bonjour").await.unwrap_err();
        assert!(matches!(&err, AssistantError::RequestFailed(e) if e.kind() == FailureKind::RateLimit));
        assert_eq!(service.history(), &[ConversationTurn::user("Bonjour")]);

        service.send_message("Bonjour").await.unwrap();
        let seen = script.seen.lock().unwrap();
        assert_eq!(seen[1].len(), 2, "retry resends the failed turn");
    }

    struct ReadOnlyStore;

    impl ConfigStore for ReadOnlyStore {
        fn load(&self) -> std::result::Result<Option<ProviderConfig>, ConfigError> {
            Ok(None)
        }

        fn save(&self, _config: &ProviderConfig) -> std::result::Result<(), ConfigError> {
            Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only config dir",
            )))
        }
    }

    #[tokio::test]
    async fn unsaved_switch_still_takes_effect() {
        let script = Script::default().reply("Salut.");
        let mut service = AssistantService::new(Arc::new(ReadOnlyStore), script.factory());
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap_err();
        service.send_message("Bonjour").await.unwrap();

        let err = service.set_provider(ProviderKind::Gemini, "AIza-9").unwrap_err();
        assert!(matches!(err, AssistantError::Config(ConfigError::Io(_))));
        assert!(service.is_configured());
        assert_eq!(service.current_provider(), ProviderKind::Gemini);
        assert!(service.history().is_empty());
    }

    #[tokio::test]
    async fn new_conversation_keeps_the_provider() {
        let script = Script::default().reply("Salut.");
        let mut service = service_with(&script, &MemoryConfigStore::new());
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap();
        service.send_message("Bonjour").await.unwrap();

        service.clear_conversation();
        assert!(service.history().is_empty());
        assert!(service.is_configured());
        assert_eq!(service.current_provider(), ProviderKind::OpenAi);
    }

    #[test]
    fn saved_config_is_restored_on_startup() {
        let script = Script::default();
        let store = MemoryConfigStore::new();
        service_with(&script, &store).set_provider(ProviderKind::Gemini, "AIza-3").unwrap();

        let reloaded = service_with(&script, &store);
        assert!(reloaded.is_configured());
        assert_eq!(reloaded.current_provider(), ProviderKind::Gemini);
        let keys = script.keys.lock().unwrap();
        assert_eq!(keys.last(), Some(&(ProviderKind::Gemini, "AIza-3".to_string())));
    }

    #[tokio::test]
    async fn second_send_is_rejected_while_first_is_in_flight() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let script = Script { gate: Some((entered.clone(), release.clone())), ..Script::default() }
            .reply("Voilà.");
        let mut service = service_with(&script, &MemoryConfigStore::new());
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap();
        let handle = AssistantHandle::new(service);

        let first = handle.begin_send("Bonjour").unwrap();
        let task = tokio::spawn(first.run());
        entered.notified().await;

        assert!(matches!(handle.begin_send("Encore"), Err(AssistantError::Busy)));
        assert!(matches!(handle.try_with(|s| s.history().len()), Err(AssistantError::Busy)));

        release.notify_one();
        assert_eq!(task.await.unwrap().unwrap(), "Voilà.");
        assert_eq!(handle.try_with(|s| s.history().len()).unwrap(), 2);
        assert_eq!(script.calls.load(Ordering::SeqCst), 1);
    }
}
