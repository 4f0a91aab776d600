//! Local commands answered without calling the provider.

use crate::shell::Contact;

pub const ADD_CONTACT_TRIGGER: &str = "ajouter une personne à mes contacts";
pub const ADD_CONTACT_REPLY: &str =
    "D'accord, quel est le nom de la personne que vous souhaitez ajouter ?";

/// What a matched command produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub reply: String,
    pub new_contact: Option<Contact>,
}

fn added_contact() -> Contact {
    Contact { name: "Dupont Jean".to_string(), phone: "06 23 45 67 89".to_string() }
}

/// Returns `Some` when `message` is a local command. Matching is
/// case-insensitive substring search for the trigger phrase.
pub fn intercept(message: &str) -> Option<CommandOutcome> {
    if message.to_lowercase().contains(ADD_CONTACT_TRIGGER) {
        return Some(CommandOutcome {
            reply: ADD_CONTACT_REPLY.to_string(),
            new_contact: Some(added_contact()),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_matches_regardless_of_case() {
        let out = intercept("Peux-tu AJOUTER UNE PERSONNE À MES CONTACTS stp").unwrap();
        assert_eq!(out.reply, ADD_CONTACT_REPLY);
        assert!(out.new_contact.is_some());
    }

    #[test]
    fn ordinary_messages_pass_through() {
        assert_eq!(intercept("Bonjour"), None);
        assert_eq!(intercept("ajouter une personne"), None);
    }
}
