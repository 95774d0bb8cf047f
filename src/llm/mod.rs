//! LLM client module: chat-completion transport and prompt templates.

mod client;
mod prompts;

pub use client::{LlmClient, Message};
pub use prompts::PromptTemplate;
