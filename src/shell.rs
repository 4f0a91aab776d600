//! Window state independent of GTK: current page, tile selection, the
//! message log shown in the assistant panel and the contact list.

use log::debug;

use crate::assistant::commands;
use crate::catalog::{self, Category};
use crate::errors::AssistantError;
use crate::voice::VoiceInput;

pub const GREETING: &str = "Bonjour ! Comment puis-je vous aider aujourd'hui ?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_user: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_user: true }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_user: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Main,
    Settings,
    QrCode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    Sending,
}

/// What the caller must do after `Shell::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Nothing happened.
    Ignored,
    /// Answered locally, the provider is not involved.
    Handled,
    /// Hand this text to the assistant, then call `Shell::finish_send`.
    Dispatch(String),
}

#[derive(Debug)]
pub struct Shell {
    page: Page,
    active_category: Option<&'static Category>,
    messages: Vec<Message>,
    contacts: Vec<Contact>,
    send_state: SendState,
    provider_configured: bool,
    pub voice: VoiceInput,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Shell {
    pub fn new(provider_configured: bool) -> Self {
        Self {
            page: Page::Main,
            active_category: None,
            messages: vec![Message::assistant(GREETING)],
            contacts: Vec::new(),
            send_state: SendState::Idle,
            provider_configured,
            voice: VoiceInput::default(),
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn active_category(&self) -> Option<&'static Category> {
        self.active_category
    }

    pub fn send_state(&self) -> SendState {
        self.send_state
    }

    /// Apply a configured-state read from the assistant. `Err` (the slot is
    /// held by a send) says nothing about the provider and is ignored.
    pub fn sync_provider_status(&mut self, status: Result<bool, AssistantError>) {
        match status {
            Ok(configured) => self.provider_configured = configured,
            Err(e) => debug!("provider status unavailable: {}", e),
        }
    }

    /// Input, voice and send controls are usable.
    pub fn controls_enabled(&self) -> bool {
        self.provider_configured && self.send_state == SendState::Idle
    }

    pub fn navigate_to(&mut self, page: Page) {
        self.page = page;
    }

    pub fn navigate_back(&mut self) {
        self.page = Page::Main;
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// A tile was pressed. `service_id` is a category id or `category.sub`.
    pub fn select_service(&mut self, service_id: &str) {
        if let Some(cat) = catalog::category(service_id) {
            self.active_category = Some(cat);
        }
        debug!("service selected: {}", service_id);
        self.push_message(Message::user(format!("J'aimerais utiliser le service {}", service_id)));
    }

    /// Reset the panel log to the greeting, for a fresh provider history.
    pub fn restart_conversation(&mut self) {
        self.messages = vec![Message::assistant(GREETING)];
    }

    pub fn back_to_categories(&mut self) {
        self.active_category = None;
    }

    /// Handle text typed (or dictated) in the assistant panel.
    pub fn submit(&mut self, input: &str) -> Submission {
        if input.trim().is_empty() || !self.controls_enabled() {
            return Submission::Ignored;
        }
        self.push_message(Message::user(input));

        if let Some(outcome) = commands::intercept(input) {
            if let Some(contact) = outcome.new_contact {
                self.add_contact(contact);
            }
            self.push_message(Message::assistant(outcome.reply));
            return Submission::Handled;
        }

        self.send_state = SendState::Sending;
        Submission::Dispatch(input.to_string())
    }

    /// Record the outcome of a dispatched send and unlock the controls.
    pub fn finish_send(&mut self, result: Result<String, AssistantError>) {
        let text = match result {
            Ok(reply) => reply,
            Err(e) => e.user_message(),
        };
        self.push_message(Message::assistant(text));
        self.send_state = SendState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ProviderKind;
    use crate::assistant::service::tests::Script;
    use crate::assistant::{AssistantHandle, AssistantService};
    use crate::errors::BackendError;
    use crate::storage::MemoryConfigStore;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn configured_shell() -> Shell {
        Shell::new(true)
    }

    #[test]
    fn starts_on_main_page_with_greeting() {
        let shell = Shell::default();
        assert_eq!(shell.page(), Page::Main);
        assert_eq!(shell.messages(), &[Message::assistant(GREETING)]);
    }

    #[test]
    fn unconfigured_provider_blocks_input() {
        let mut shell = Shell::new(false);
        assert!(!shell.controls_enabled());
        assert_eq!(shell.submit("Bonjour"), Submission::Ignored);
        assert_eq!(shell.messages().len(), 1);
    }

    #[test]
    fn blank_input_is_ignored() {
        let mut shell = configured_shell();
        assert_eq!(shell.submit("   "), Submission::Ignored);
        assert_eq!(shell.messages().len(), 1);
    }

    #[test]
    fn selecting_a_sub_service_posts_a_user_message() {
        let mut shell = configured_shell();
        shell.select_service("medical");
        assert_eq!(shell.active_category().map(|c| c.id), Some("medical"));
        shell.select_service("medical.medication");
        assert_eq!(
            shell.messages().last(),
            Some(&Message::user("J'aimerais utiliser le service medical.medication"))
        );
        assert_eq!(shell.active_category().map(|c| c.id), Some("medical"));
        shell.back_to_categories();
        assert!(shell.active_category().is_none());
    }

    #[test]
    fn trigger_phrase_adds_one_contact_and_one_reply() {
        let mut shell = configured_shell();
        let out = shell.submit("Je veux ajouter une personne à mes contacts");
        assert_eq!(out, Submission::Handled);
        assert_eq!(shell.contacts().len(), 1);
        assert_eq!(shell.messages().len(), 3);
        assert_eq!(shell.messages()[2], Message::assistant(commands::ADD_CONTACT_REPLY));
        assert!(shell.controls_enabled());
    }

    #[test]
    fn sending_locks_controls_until_finished() {
        let mut shell = configured_shell();
        assert_eq!(shell.submit("Bonjour"), Submission::Dispatch("Bonjour".into()));
        assert_eq!(shell.send_state(), SendState::Sending);
        assert_eq!(shell.submit("Encore"), Submission::Ignored);
        assert_eq!(shell.messages().len(), 2);

        shell.finish_send(Err(AssistantError::RequestFailed(BackendError::Network("down".into()))));
        assert!(shell.controls_enabled());
        assert!(shell.messages()[2].text.starts_with("Erreur: Problème de connexion"));
        assert!(!shell.messages()[2].is_user);
    }

    #[test]
    fn pages_switch_and_return_to_main() {
        let mut shell = configured_shell();
        shell.navigate_to(Page::QrCode);
        assert_eq!(shell.page(), Page::QrCode);
        shell.navigate_back();
        assert_eq!(shell.page(), Page::Main);
    }

    #[test]
    fn busy_status_read_keeps_the_provider_configured() {
        let script = Script::default();
        let mut service =
            AssistantService::new(Arc::new(MemoryConfigStore::new()), script.factory());
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap();
        let handle = AssistantHandle::new(service);
        let mut shell = Shell::new(true);

        let Submission::Dispatch(text) = shell.submit("Bonjour") else {
            panic!("message should be dispatched");
        };
        let pending = handle.begin_send(text).unwrap();
        let status = handle.try_with(|s| s.is_configured());
        assert!(matches!(status, Err(AssistantError::Busy)));
        shell.sync_provider_status(status);
        drop(pending);

        shell.finish_send(Ok("Bonjour !".into()));
        assert!(shell.controls_enabled());

        shell.sync_provider_status(Ok(false));
        assert!(!shell.controls_enabled());
    }

    #[test]
    fn restarting_the_conversation_leaves_only_the_greeting() {
        let mut shell = configured_shell();
        shell.select_service("finance");
        shell.submit("Ajouter une personne à mes contacts");
        shell.restart_conversation();
        assert_eq!(shell.messages(), &[Message::assistant(GREETING)]);
        assert_eq!(shell.contacts().len(), 1);
    }

    #[tokio::test]
    async fn command_never_reaches_the_provider() {
        let script = Script::default().reply("Bonjour !");
        let mut service =
            AssistantService::new(Arc::new(MemoryConfigStore::new()), script.factory());
        service.set_provider(ProviderKind::OpenAi, "sk-1").unwrap();
        let handle = AssistantHandle::new(service);
        let mut shell = Shell::new(true);

        for input in ["Ajouter une personne à mes contacts", "Bonjour"] {
            if let Submission::Dispatch(text) = shell.submit(input) {
                let result = handle.begin_send(text).unwrap().run().await;
                shell.finish_send(result);
            }
        }

        assert_eq!(script.calls.load(Ordering::SeqCst), 1);
        assert_eq!(shell.contacts().len(), 1);
        assert_eq!(shell.messages().last(), Some(&Message::assistant("Bonjour !")));
    }
}
