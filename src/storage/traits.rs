use async_trait::async_trait;

use super::{LlmRecord, StoreError};

/// Exchange-log collaborator backed by the hosted `llm_records` table.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, input_text: &str, output_text: &str) -> Result<LlmRecord, StoreError>;

    /// Most recent records first, at most `limit` of them.
    async fn list(&self, limit: u32) -> Result<Vec<LlmRecord>, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<LlmRecord, StoreError>;

    /// Returns true when a record was actually removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
