use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    point_id::PointIdOptions, value::Kind, CreateCollectionBuilder, Distance, PointId,
    PointStruct, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;

use super::{NewRecord, RecordPayload, SearchHit, StoredRecord, VectorStore};
use crate::errors::ApiError;

pub struct QdrantStore {
    client: Qdrant,
    dimension: usize,
}

impl QdrantStore {
    pub fn connect(url: &str, api_key: Option<String>, dimension: usize) -> anyhow::Result<Self> {
        let client = Qdrant::from_url(url).api_key(api_key).build()?;
        Ok(Self { client, dimension })
    }
}

fn payload_field(payload: &HashMap<String, Value>, key: &str) -> String {
    payload
        .get(key)
        .and_then(|value| match &value.kind {
            Some(Kind::StringValue(text)) => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

fn record_payload(payload: &HashMap<String, Value>) -> RecordPayload {
    RecordPayload {
        text: payload_field(payload, "text"),
        url: payload_field(payload, "url"),
    }
}

fn id_string(id: Option<PointId>) -> String {
    match id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        Some(PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn create_collection(&self, name: &str) -> Result<bool, ApiError> {
        let response = self
            .client
            .create_collection(
                CreateCollectionBuilder::new(name).vectors_config(VectorParamsBuilder::new(
                    self.dimension as u64,
                    Distance::Cosine,
                )),
            )
            .await
            .map_err(|err| {
                tracing::error!("Error while creating a new collection in vector DB: {}", err);
                ApiError::internal(err)
            })?;
        Ok(response.result)
    }

    async fn upsert(&self, collection: &str, records: Vec<NewRecord>) -> Result<(), ApiError> {
        let mut points = Vec::with_capacity(records.len());
        for record in records {
            let payload = Payload::try_from(json!({
                "text": record.payload.text,
                "url": record.payload.url,
            }))
            .map_err(ApiError::internal)?;
            points.push(PointStruct::new(record.id, record.vector, payload));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points))
            .await
            .map_err(|err| {
                tracing::error!("Error while inserting records into the vector DB: {}", err);
                ApiError::internal(err)
            })?;
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ApiError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector, limit as u64).with_payload(true),
            )
            .await
            .map_err(|err| {
                tracing::error!("Error while searching the vector DB: {}", err);
                ApiError::internal(err)
            })?;

        Ok(response
            .result
            .into_iter()
            .map(|point| SearchHit {
                payload: record_payload(&point.payload),
                score: point.score,
                id: id_string(point.id),
            })
            .collect())
    }

    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<StoredRecord>, ApiError> {
        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(collection)
                    .limit(limit as u32)
                    .with_payload(true),
            )
            .await
            .map_err(|err| {
                tracing::error!("Error while fetching the records from vector DB: {}", err);
                ApiError::internal(err)
            })?;

        Ok(response
            .result
            .into_iter()
            .map(|point| StoredRecord {
                payload: record_payload(&point.payload),
                id: id_string(point.id),
            })
            .collect())
    }
}
