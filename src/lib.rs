//! Artist and track insight reports built from streaming-catalog data,
//! community metadata and a chat-completion model.

pub mod catalog;
pub mod config;
pub mod hub;
pub mod insight;
pub mod llm;
