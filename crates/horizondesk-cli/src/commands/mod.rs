//! CLI command implementations.

pub mod chat;
pub mod config;
pub mod history;
pub mod secrets;
pub mod settings;
pub mod snippets;
