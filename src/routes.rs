use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::llm_providers::models;
use crate::prompts::{DEFAULT_PROMPT_TYPE, DEFAULT_TEMPLATE_TYPE};
use crate::service::ChatService;
use crate::storage::LlmRecord;

const DEFAULT_HISTORY_LIMIT: u32 = 10;

pub fn router(service: Arc<ChatService>) -> Router {
    Router::new()
        .route("/api/llm", post(chat).get(history))
        .with_state(service)
}

#[derive(Serialize)]
struct ChatEnvelope<'a> {
    success: bool,
    message: String,
    input: &'a str,
    #[serde(rename = "promptType")]
    prompt_type: &'a str,
    #[serde(rename = "templateType")]
    template_type: &'a str,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    usage: Option<Value>,
}

#[derive(Serialize)]
struct HistoryEnvelope {
    success: bool,
    records: Vec<LlmRecord>,
    count: usize,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

fn error_response(status: StatusCode, error: &str, details: Option<Value>) -> Response {
    (
        status,
        Json(ErrorEnvelope {
            success: false,
            error: error.to_string(),
            details,
        }),
    )
        .into_response()
}

fn str_field<'a>(body: &'a Value, key: &str, default: &'a str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or(default)
}

async fn chat(State(service): State<Arc<ChatService>>, Json(body): Json<Value>) -> Response {
    // Validation happens before anything else: nothing is persisted for a
    // missing or non-string message.
    let message = match body.get("message").and_then(Value::as_str) {
        Some(m) if !m.is_empty() => m,
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Message is required and must be a string",
                None,
            )
        }
    };

    let model = str_field(&body, "model", models::DEFAULT_MODEL);
    let prompt_type = str_field(&body, "promptType", DEFAULT_PROMPT_TYPE);
    let template_type = str_field(&body, "templateType", DEFAULT_TEMPLATE_TYPE);

    debug!(model, prompt_type, template_type, "handling chat request");

    match service
        .handle_chat(message, model, prompt_type, template_type)
        .await
    {
        Ok(reply) => Json(ChatEnvelope {
            success: true,
            message: reply.message,
            input: message,
            prompt_type,
            template_type,
            model,
            usage: reply.usage,
        })
        .into_response(),
        Err(e) => {
            error!("chat request failed: {}", e);
            let details = e.details();
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), details)
        }
    }
}

async fn history(
    State(service): State<Arc<ChatService>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    // Absent or unparseable limit falls back to the default.
    let limit = params
        .get("limit")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_HISTORY_LIMIT);

    match service.history(limit).await {
        Ok(records) => Json(HistoryEnvelope {
            success: true,
            count: records.len(),
            records,
        })
        .into_response(),
        Err(e) => {
            error!("failed to fetch llm records: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch LLM records",
                Some(Value::String(e.to_string())),
            )
        }
    }
}
