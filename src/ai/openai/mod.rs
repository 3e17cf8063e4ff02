pub mod chat;
pub mod client;
pub mod types;

pub use chat::OpenAiChatClient;
pub use client::{GROQ_BASE_URL, OPENAI_BASE_URL};
