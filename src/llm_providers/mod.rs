pub mod mock;
pub mod openrouter;
pub mod traits;

pub use traits::{
    ChatClient, ChatCompletion, ChatError, ChatMessage, CompletionOutcome, CompletionRequest,
};

/// Common OpenRouter model identifiers. Descriptive only; caller-supplied
/// model names are passed through to the API without validation.
pub mod models {
    pub const GPT_4_TURBO: &str = "openai/gpt-4-turbo";
    pub const GPT_3_5_TURBO: &str = "openai/gpt-3.5-turbo";
    pub const CLAUDE_HAIKU: &str = "anthropic/claude-3-haiku";
    pub const CLAUDE_SONNET: &str = "anthropic/claude-3-sonnet";
    pub const LLAMA_3_8B: &str = "meta-llama/llama-3-8b-instruct";
    pub const GEMINI_PRO: &str = "google/gemini-pro";

    pub const DEFAULT_MODEL: &str = "anthropic/claude-3-sonnet-20240229";
}
