use std::sync::Mutex;

use async_trait::async_trait;

use super::{LlmRecord, RecordStore, StoreError};

/// In-memory record store for tests: counts calls and can be switched into a
/// failing mode to exercise the best-effort persistence paths.
#[derive(Default)]
pub struct MockRecordStore {
    pub records: Mutex<Vec<LlmRecord>>,
    pub create_calls: Mutex<usize>,
    pub list_calls: Mutex<usize>,
    pub fail_create: Mutex<bool>,
    pub fail_list: Mutex<bool>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create(self) -> Self {
        *self.fail_create.lock().unwrap() = true;
        self
    }

    pub fn failing_list(self) -> Self {
        *self.fail_list.lock().unwrap() = true;
        self
    }

    /// Seeds `count` records with ascending ids and timestamps.
    pub fn seeded(count: usize) -> Self {
        let store = Self::new();
        {
            let mut records = store.records.lock().unwrap();
            for i in 0..count {
                records.push(LlmRecord {
                    id: i as i64 + 1,
                    input_text: format!("input {}", i + 1),
                    output_text: format!("output {}", i + 1),
                    created_at: format!("2024-01-01T00:00:{:02}+00:00", i),
                });
            }
        }
        store
    }

    pub fn created(&self) -> usize {
        *self.create_calls.lock().unwrap()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn create(&self, input_text: &str, output_text: &str) -> Result<LlmRecord, StoreError> {
        *self.create_calls.lock().unwrap() += 1;
        if *self.fail_create.lock().unwrap() {
            return Err(StoreError::Api {
                status: 503,
                body: "table unavailable".to_string(),
            });
        }

        let mut records = self.records.lock().unwrap();
        let id = records.last().map(|r| r.id + 1).unwrap_or(1);
        let record = LlmRecord {
            id,
            input_text: input_text.to_string(),
            output_text: output_text.to_string(),
            created_at: format!("2024-01-01T00:01:{:02}+00:00", id.min(59)),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self, limit: u32) -> Result<Vec<LlmRecord>, StoreError> {
        *self.list_calls.lock().unwrap() += 1;
        if *self.fail_list.lock().unwrap() {
            return Err(StoreError::Api {
                status: 503,
                body: "table unavailable".to_string(),
            });
        }

        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<LlmRecord, StoreError> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}
