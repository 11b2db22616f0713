//! Vector store abstraction. The engine behind it (Qdrant) is a black box;
//! this layer only shapes records in and out of it.

mod qdrant;

pub use qdrant::QdrantStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Payload stored next to every vector: the chunk text and its source URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordPayload {
    pub text: String,
    pub url: String,
}

/// A record about to be written. Ids are fresh UUIDv4 strings minted by the
/// indexing pipeline; the vector length must match the collection dimension.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: RecordPayload,
}

/// One ranked similarity-search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub payload: RecordPayload,
}

/// A record read back while paginating a collection.
#[derive(Debug, Clone, Serialize)]
pub struct StoredRecord {
    pub id: String,
    pub payload: RecordPayload,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates a collection sized for the deployment's embedding dimension.
    /// Returns whether the engine acknowledged the creation.
    async fn create_collection(&self, name: &str) -> Result<bool, ApiError>;

    /// Writes a batch of records in one call.
    async fn upsert(&self, collection: &str, records: Vec<NewRecord>) -> Result<(), ApiError>;

    /// Ranked similarity search against a collection.
    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ApiError>;

    /// Reads up to `limit` records from the start of a collection.
    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<StoredRecord>, ApiError>;
}
