pub mod commands;
pub mod conversation;
pub mod service;

pub use service::{AssistantHandle, AssistantService};
