pub mod mock;
pub mod supabase;
pub mod traits;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use traits::RecordStore;

/// One persisted exchange. Append-only: records are created, listed, fetched
/// or deleted, never updated. `id` and `created_at` are assigned server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmRecord {
    pub id: i64,
    pub input_text: String,
    pub output_text: String,
    pub created_at: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage transport error: {0}")]
    Network(String),

    #[error("storage API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("record {0} not found")]
    NotFound(i64),

    #[error("unexpected storage response: {0}")]
    Decode(String),
}
