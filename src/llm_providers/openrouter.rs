use async_trait::async_trait;
use tracing::{debug, error, instrument, warn};

use super::traits::{decode_completion, ChatClient, ChatError, CompletionOutcome, CompletionRequest};

const APP_TITLE: &str = "llm-relay-service";

/// Chat-completion client for the OpenRouter API (OpenAI-compatible wire
/// shape). One instance is constructed at bootstrap and shared.
pub struct OpenRouterClient {
    api_key: String,
    base_url: String,
    site_url: String,
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new(api_key: String, base_url: String, site_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            site_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionOutcome, ChatError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!("sending chat completion request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("error sending request to OpenRouter: {}", e);
                ChatError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("HTTP error from OpenRouter: {}", status);
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await.map_err(|e| {
            error!("error reading OpenRouter response body: {}", e);
            ChatError::Network(e.to_string())
        })?;

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(body) => Ok(decode_completion(body)),
            Err(e) => {
                warn!("OpenRouter returned a non-JSON body: {}", e);
                Ok(CompletionOutcome::Unrecognized)
            }
        }
    }
}
