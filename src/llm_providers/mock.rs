use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::traits::{
    AssistantMessage, ChatClient, ChatCompletion, ChatError, Choice, CompletionOutcome,
    CompletionRequest,
};

/// Scripted chat collaborator for tests: outcomes are popped in order, and
/// every call (including its request) is recorded.
#[derive(Default)]
pub struct MockChatClient {
    outcomes: Mutex<VecDeque<Result<CompletionOutcome, ChatError>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always replies with the given text (and no usage block).
    pub fn replying(text: &str) -> Self {
        let mock = Self::new();
        mock.push_reply(text);
        mock
    }

    pub fn push_reply(&self, text: &str) {
        self.push_outcome(Ok(CompletionOutcome::Completion(ChatCompletion {
            choices: vec![Choice {
                message: AssistantMessage {
                    content: Some(text.to_string()),
                },
            }],
            usage: None,
        })));
    }

    pub fn push_unrecognized(&self) {
        self.push_outcome(Ok(CompletionOutcome::Unrecognized));
    }

    pub fn push_error(&self, status: u16, body: &str) {
        self.push_outcome(Err(ChatError::Api {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_outcome(&self, outcome: Result<CompletionOutcome, ChatError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionOutcome, ChatError> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(CompletionOutcome::Unrecognized))
    }
}
