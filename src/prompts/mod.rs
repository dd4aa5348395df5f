pub mod resolver;

use std::collections::HashMap;

use serde::Deserialize;

pub use resolver::{PromptResolver, ResolvedPrompt};

pub const DEFAULT_PROMPT_TYPE: &str = "default";
pub const DEFAULT_TEMPLATE_TYPE: &str = "question";

pub(crate) const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Please provide accurate, helpful, and well-structured responses to user questions.";
pub(crate) const DEFAULT_USER_TEMPLATE: &str = "Please answer this question: {input}";

/// Prompt configuration document: named system prompts plus named user-prompt
/// templates, each template carrying a single `{input}` placeholder.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptConfig {
    #[serde(default)]
    pub system_prompts: HashMap<String, String>,
    #[serde(default)]
    pub user_prompt_templates: HashMap<String, String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        let mut config = PromptConfig {
            system_prompts: HashMap::new(),
            user_prompt_templates: HashMap::new(),
        };
        config.backfill_defaults();
        config
    }
}

impl PromptConfig {
    /// The `default` system prompt and `question` template must always be
    /// resolvable, even when the loaded document omits them.
    pub fn backfill_defaults(&mut self) {
        self.system_prompts
            .entry(DEFAULT_PROMPT_TYPE.to_string())
            .or_insert_with(|| DEFAULT_SYSTEM_PROMPT.to_string());
        self.user_prompt_templates
            .entry(DEFAULT_TEMPLATE_TYPE.to_string())
            .or_insert_with(|| DEFAULT_USER_TEMPLATE.to_string());
    }
}
