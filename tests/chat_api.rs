mod common;

mod chat_api {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use llm_relay_service::llm_providers::mock::MockChatClient;
    use llm_relay_service::llm_providers::traits::{
        AssistantMessage, ChatCompletion, Choice, CompletionOutcome,
    };
    use llm_relay_service::prompts::PromptResolver;
    use llm_relay_service::routes;
    use llm_relay_service::service::ChatService;
    use llm_relay_service::storage::mock::MockRecordStore;
    use serde_json::{json, Value};

    use crate::common;

    async fn spawn_app(
        chat: Arc<MockChatClient>,
        store: Arc<MockRecordStore>,
    ) -> SocketAddr {
        common::setup_logger("error");
        let resolver = PromptResolver::new("/nonexistent/prompts.json");
        let service = Arc::new(ChatService::new(resolver, chat, store));
        common::serve(routes::router(service)).await
    }

    fn url(addr: SocketAddr) -> String {
        format!("http://{}/api/llm", addr)
    }

    #[tokio::test]
    async fn post_with_valid_message_returns_success_envelope() {
        let chat = Arc::new(MockChatClient::replying("4"));
        let store = Arc::new(MockRecordStore::new());
        let addr = spawn_app(chat, store.clone()).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "message": "What is 2+2?" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "4");
        assert_eq!(body["input"], "What is 2+2?");
        assert_eq!(body["promptType"], "default");
        assert_eq!(body["templateType"], "question");
        assert_eq!(body["model"], "anthropic/claude-3-sonnet-20240229");
        assert!(body.get("usage").is_none());

        // Persisted before responding.
        assert_eq!(store.created(), 1);
        let records = store.records.lock().unwrap();
        assert_eq!(records[0].input_text, "What is 2+2?");
        assert_eq!(records[0].output_text, "4");
    }

    #[tokio::test]
    async fn post_echoes_caller_supplied_fields() {
        let chat = Arc::new(MockChatClient::replying("ok"));
        let store = Arc::new(MockRecordStore::new());
        let addr = spawn_app(chat, store).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({
                "message": "hi",
                "model": "openai/gpt-4-turbo",
                "promptType": "creative",
                "templateType": "summarize"
            }))
            .send()
            .await
            .unwrap();

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["model"], "openai/gpt-4-turbo");
        assert_eq!(body["promptType"], "creative");
        assert_eq!(body["templateType"], "summarize");
    }

    #[tokio::test]
    async fn post_passes_usage_through_opaquely() {
        let chat = Arc::new(MockChatClient::new());
        chat.push_outcome(Ok(CompletionOutcome::Completion(ChatCompletion {
            choices: vec![Choice {
                message: AssistantMessage {
                    content: Some("4".to_string()),
                },
            }],
            usage: Some(json!({ "prompt_tokens": 12, "completion_tokens": 1 })),
        })));
        let store = Arc::new(MockRecordStore::new());
        let addr = spawn_app(chat, store).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "message": "What is 2+2?" }))
            .send()
            .await
            .unwrap();

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["usage"]["prompt_tokens"], 12);
        assert_eq!(body["usage"]["completion_tokens"], 1);
    }

    #[tokio::test]
    async fn post_with_empty_message_returns_400_without_side_effects() {
        let chat = Arc::new(MockChatClient::new());
        let store = Arc::new(MockRecordStore::new());
        let addr = spawn_app(chat.clone(), store.clone()).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "message": "" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(chat.calls(), 0);
        assert_eq!(store.created(), 0);
    }

    #[tokio::test]
    async fn post_with_missing_message_returns_400() {
        let chat = Arc::new(MockChatClient::new());
        let store = Arc::new(MockRecordStore::new());
        let addr = spawn_app(chat, store.clone()).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "model": "openai/gpt-4-turbo" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(store.created(), 0);
    }

    #[tokio::test]
    async fn post_with_non_string_message_returns_400() {
        let chat = Arc::new(MockChatClient::new());
        let store = Arc::new(MockRecordStore::new());
        let addr = spawn_app(chat, store.clone()).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "message": 42 }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(store.created(), 0);
    }

    #[tokio::test]
    async fn post_llm_failure_returns_500_and_records_error_once() {
        let chat = Arc::new(MockChatClient::new());
        chat.push_error(502, r#"{"error":"upstream unavailable"}"#);
        let store = Arc::new(MockRecordStore::new());
        let addr = spawn_app(chat, store.clone()).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "message": "hello" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["details"]["error"], "upstream unavailable");

        assert_eq!(store.created(), 1);
        let records = store.records.lock().unwrap();
        assert!(records[0].output_text.starts_with("Error: "));
    }

    #[tokio::test]
    async fn post_llm_failure_with_failing_store_keeps_500_shape() {
        let chat = Arc::new(MockChatClient::new());
        chat.push_error(500, "boom");
        let store = Arc::new(MockRecordStore::new().failing_create());
        let addr = spawn_app(chat, store.clone()).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "message": "hello" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(store.created(), 1);
    }

    #[tokio::test]
    async fn post_succeeds_even_when_persistence_fails() {
        let chat = Arc::new(MockChatClient::replying("still here"));
        let store = Arc::new(MockRecordStore::new().failing_create());
        let addr = spawn_app(chat, store).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "message": "hello" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "still here");
    }

    #[tokio::test]
    async fn post_unrecognized_shape_returns_sentinel_reply() {
        let chat = Arc::new(MockChatClient::new());
        chat.push_unrecognized();
        let store = Arc::new(MockRecordStore::new());
        let addr = spawn_app(chat, store).await;

        let response = reqwest::Client::new()
            .post(url(addr))
            .json(&json!({ "message": "hello" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "No response generated");
    }

    #[tokio::test]
    async fn get_history_defaults_to_ten_newest_first() {
        let chat = Arc::new(MockChatClient::new());
        let store = Arc::new(MockRecordStore::seeded(12));
        let addr = spawn_app(chat, store).await;

        let response = reqwest::Client::new().get(url(addr)).send().await.unwrap();

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 10);
        assert_eq!(body["records"][0]["id"], 12);
        assert_eq!(body["records"][9]["id"], 3);
    }

    #[tokio::test]
    async fn get_history_honors_limit() {
        let chat = Arc::new(MockChatClient::new());
        let store = Arc::new(MockRecordStore::seeded(12));
        let addr = spawn_app(chat, store).await;

        let response = reqwest::Client::new()
            .get(format!("{}?limit=5", url(addr)))
            .send()
            .await
            .unwrap();

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["count"], 5);
        assert_eq!(body["records"][0]["id"], 12);
        assert_eq!(body["records"][4]["id"], 8);
    }

    #[tokio::test]
    async fn get_history_unparseable_limit_defaults_to_ten() {
        let chat = Arc::new(MockChatClient::new());
        let store = Arc::new(MockRecordStore::seeded(12));
        let addr = spawn_app(chat, store).await;

        let response = reqwest::Client::new()
            .get(format!("{}?limit=abc", url(addr)))
            .send()
            .await
            .unwrap();

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["count"], 10);
    }

    #[tokio::test]
    async fn get_history_store_failure_returns_500_with_details() {
        let chat = Arc::new(MockChatClient::new());
        let store = Arc::new(MockRecordStore::new().failing_list());
        let addr = spawn_app(chat, store).await;

        let response = reqwest::Client::new().get(url(addr)).send().await.unwrap();

        assert_eq!(response.status(), 500);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Failed to fetch LLM records");
        assert!(body["details"].is_string());
    }
}
