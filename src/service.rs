use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use crate::llm_providers::{
    ChatClient, ChatCompletion, ChatError, ChatMessage, CompletionOutcome, CompletionRequest,
};
use crate::prompts::PromptResolver;
use crate::storage::{LlmRecord, RecordStore, StoreError};

/// Reply substituted when the completion API returns no usable content.
pub const NO_RESPONSE_SENTINEL: &str = "No response generated";

/// What happened to the best-effort write of an exchange. A failed write is a
/// named outcome, never an error: the reply still goes back to the caller.
#[derive(Debug)]
pub enum PersistOutcome {
    Saved(i64),
    Failed(StoreError),
}

#[derive(Debug)]
pub struct ChatReply {
    pub message: String,
    pub usage: Option<serde_json::Value>,
    pub persisted: PersistOutcome,
}

/// Orchestrates one chat exchange: resolve prompts, call the completion
/// collaborator, log the exchange, return the reply. Stateless across calls;
/// collaborators are injected at bootstrap.
pub struct ChatService {
    resolver: PromptResolver,
    chat: Arc<dyn ChatClient>,
    store: Arc<dyn RecordStore>,
}

impl ChatService {
    pub fn new(
        resolver: PromptResolver,
        chat: Arc<dyn ChatClient>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            resolver,
            chat,
            store,
        }
    }

    #[instrument(skip(self, message), fields(model = %model, prompt_type = %prompt_type))]
    pub async fn handle_chat(
        &self,
        message: &str,
        model: &str,
        prompt_type: &str,
        template_type: &str,
    ) -> Result<ChatReply, ChatError> {
        let resolved = self.resolver.resolve(prompt_type, template_type, message);
        let request = CompletionRequest::new(
            model,
            vec![
                ChatMessage::system(resolved.system_prompt),
                ChatMessage::user(resolved.user_prompt),
            ],
        );

        debug!("forwarding conversation to completion API");
        let outcome = match self.chat.complete(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("completion request failed: {}", e);
                // Best-effort record of the failed exchange; a failure here
                // is swallowed and the original error still propagates.
                if let Err(store_err) = self
                    .store
                    .create(message, &format!("Error: {}", e))
                    .await
                {
                    warn!("could not record failed exchange: {}", store_err);
                }
                return Err(e);
            }
        };

        let (reply, usage) = match outcome {
            CompletionOutcome::Completion(ChatCompletion { choices, usage }) => {
                let content = choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .unwrap_or_else(|| NO_RESPONSE_SENTINEL.to_string());
                (content, usage)
            }
            CompletionOutcome::Unrecognized => {
                warn!("completion API returned an unrecognized shape, substituting sentinel reply");
                (NO_RESPONSE_SENTINEL.to_string(), None)
            }
        };

        let persisted = match self.store.create(message, &reply).await {
            Ok(record) => {
                debug!(id = record.id, "exchange recorded");
                PersistOutcome::Saved(record.id)
            }
            Err(e) => {
                warn!("exchange not recorded: {}", e);
                PersistOutcome::Failed(e)
            }
        };

        Ok(ChatReply {
            message: reply,
            usage,
            persisted,
        })
    }

    #[instrument(skip(self))]
    pub async fn history(&self, limit: u32) -> Result<Vec<LlmRecord>, StoreError> {
        self.store.list(limit).await
    }
}
