//! Error types shared by the assistant, its backends and the config store.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("La clé API ne peut pas être vide")]
    EmptyApiKey,

    #[error("Le message ne peut pas être vide")]
    EmptyInput,

    #[error("Aucun fournisseur d'IA configuré")]
    NotConfigured,

    #[error("Un message est déjà en cours d'envoi")]
    Busy,

    #[error("Échec de la requête : {0}")]
    RequestFailed(#[from] BackendError),

    #[error("Impossible d'enregistrer la configuration : {0}")]
    Config(#[from] ConfigError),
}

impl AssistantError {
    /// Text shown to the user in an assistant bubble.
    pub fn user_message(&self) -> String {
        match self {
            AssistantError::RequestFailed(e) => e.kind().user_message().to_string(),
            other => other.to_string(),
        }
    }
}

/// Failure of a single chat-completion call.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode(e.to_string())
        } else {
            BackendError::Network(e.to_string())
        }
    }
}

impl BackendError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BackendError::Network(_) => FailureKind::Network,
            BackendError::Status { status: 401 | 403, .. } => FailureKind::InvalidKey,
            BackendError::Status { status: 429, .. } => FailureKind::RateLimit,
            other => FailureKind::from_text(&other.to_string()),
        }
    }
}

/// The four canned outcomes a failed request is reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidKey,
    RateLimit,
    Network,
    Generic,
}

impl FailureKind {
    /// Classify by substring, first match wins.
    pub fn from_text(text: &str) -> Self {
        if text.contains("API key") {
            FailureKind::InvalidKey
        } else if text.contains("rate limit") {
            FailureKind::RateLimit
        } else if text.contains("network") {
            FailureKind::Network
        } else {
            FailureKind::Generic
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            FailureKind::InvalidKey => "Erreur: Clé API invalide. Veuillez vérifier vos paramètres.",
            FailureKind::RateLimit => "Erreur: Limite de requêtes atteinte. Veuillez réessayer plus tard.",
            FailureKind::Network => "Erreur: Problème de connexion. Veuillez vérifier votre connexion internet.",
            FailureKind::Generic => "Une erreur s'est produite. Veuillez réessayer.",
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config dir")]
    NoConfigDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_pick_the_canned_message() {
        let unauthorized = BackendError::Status { status: 401, body: String::new() };
        assert_eq!(unauthorized.kind(), FailureKind::InvalidKey);

        let throttled = BackendError::Status { status: 429, body: String::new() };
        assert_eq!(throttled.kind(), FailureKind::RateLimit);

        let net = BackendError::Network("connection refused".into());
        assert_eq!(net.kind(), FailureKind::Network);
    }

    #[test]
    fn body_text_is_matched_when_status_is_ambiguous() {
        let bad_key = BackendError::Status {
            status: 400,
            body: "API key not valid. Please pass a valid API key.".into(),
        };
        assert_eq!(bad_key.kind(), FailureKind::InvalidKey);

        let other = BackendError::Status { status: 500, body: "internal".into() };
        assert_eq!(other.kind(), FailureKind::Generic);
        assert_eq!(
            AssistantError::from(other).user_message(),
            "Une erreur s'est produite. Veuillez réessayer."
        );
    }

    #[test]
    fn validation_errors_keep_their_own_text() {
        assert_eq!(
            AssistantError::EmptyInput.user_message(),
            "Le message ne peut pas être vide"
        );
    }
}
