use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, instrument};

use super::{LlmRecord, RecordStore, StoreError};

const TABLE: &str = "llm_records";

#[derive(Serialize)]
struct NewRecord<'a> {
    input_text: &'a str,
    output_text: &'a str,
}

/// PostgREST client for the Supabase `llm_records` table.
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, TABLE)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn read_rows(response: reqwest::Response) -> Result<Vec<LlmRecord>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("HTTP error from storage API: {}", status);
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<LlmRecord>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    #[instrument(skip(self, input_text, output_text))]
    async fn create(&self, input_text: &str, output_text: &str) -> Result<LlmRecord, StoreError> {
        let response = self
            .authed(self.client.post(self.table_url()))
            .header("Prefer", "return=representation")
            .json(&NewRecord {
                input_text,
                output_text,
            })
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let rows = Self::read_rows(response).await?;
        let record = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("create returned no representation".to_string()))?;

        debug!(id = record.id, "created llm record");
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: u32) -> Result<Vec<LlmRecord>, StoreError> {
        let limit = limit.to_string();
        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let rows = Self::read_rows(response).await?;
        debug!(count = rows.len(), "listed llm records");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<LlmRecord, StoreError> {
        let id_filter = format!("eq.{}", id);
        let response = self
            .authed(self.client.get(self.table_url()))
            .query(&[("select", "*"), ("id", id_filter.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let rows = Self::read_rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let response = self
            .authed(self.client.delete(self.table_url()))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id).as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let rows = Self::read_rows(response).await?;
        debug!(id, deleted = !rows.is_empty(), "delete llm record");
        Ok(!rows.is_empty())
    }
}
