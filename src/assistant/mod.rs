//! A chat page with a rule-based financial assistant.

mod chat;
mod responses;

pub use chat::{get_assistant_page, send_message_endpoint};
