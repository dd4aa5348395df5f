use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use super::{PromptConfig, DEFAULT_PROMPT_TYPE, DEFAULT_TEMPLATE_TYPE};

const PLACEHOLDER: &str = "{input}";

/// A conversation resolved to concrete text: the selected system prompt and
/// the user template with its placeholder substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrompt {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Resolves (promptType, templateType, message) triples against the prompt
/// configuration document. The document is re-read on every call; an
/// unreadable or malformed document degrades to the embedded defaults, so
/// resolution never fails outward.
pub struct PromptResolver {
    path: PathBuf,
}

impl PromptResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> PromptConfig {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "could not read prompt config '{}', using embedded defaults: {}",
                    self.path.display(),
                    e
                );
                return PromptConfig::default();
            }
        };

        match serde_json::from_str::<PromptConfig>(&raw) {
            Ok(mut config) => {
                config.backfill_defaults();
                config
            }
            Err(e) => {
                warn!(
                    "malformed prompt config '{}', using embedded defaults: {}",
                    self.path.display(),
                    e
                );
                PromptConfig::default()
            }
        }
    }

    pub fn resolve(&self, prompt_type: &str, template_type: &str, message: &str) -> ResolvedPrompt {
        let config = self.load();

        let system_prompt = config
            .system_prompts
            .get(prompt_type)
            .or_else(|| config.system_prompts.get(DEFAULT_PROMPT_TYPE))
            .cloned()
            .unwrap_or_else(|| super::DEFAULT_SYSTEM_PROMPT.to_string());

        let template = config
            .user_prompt_templates
            .get(template_type)
            .or_else(|| config.user_prompt_templates.get(DEFAULT_TEMPLATE_TYPE))
            .cloned()
            .unwrap_or_else(|| super::DEFAULT_USER_TEMPLATE.to_string());

        // First occurrence only, single pass, no escaping.
        let user_prompt = template.replacen(PLACEHOLDER, message, 1);

        debug!(prompt_type, template_type, "resolved prompt pair");

        ResolvedPrompt {
            system_prompt,
            user_prompt,
        }
    }
}
