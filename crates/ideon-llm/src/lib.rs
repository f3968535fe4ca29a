pub mod types;
pub mod traits;
pub mod config;
pub mod openai;
pub mod gemini;

pub use traits::{ChatClient, ChatRequest, ChatResponse, ChatOptions, TokenUsage};
pub use types::Message;
pub use config::{ClientFactory, GeminiConfig, OpenAIConfig, ProviderConfig, ProviderType};
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
