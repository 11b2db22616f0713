use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::require_bearer;
use crate::errors::ApiError;
use crate::models::ChatMessage;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub url: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub collection_name: String,
}

#[derive(Debug, Deserialize)]
pub struct FetchRecordsRequest {
    pub collection_name: String,
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Scrapes and indexes each URL into the default collection, reporting
/// which URLs made it and which did not.
pub async fn index_urls(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<IndexRequest>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers, &state.settings.secret_key)?;

    let report = state
        .indexer
        .index_urls(&request.url, &state.settings.default_collection)
        .await;

    Ok(Json(json!({
        "status": report.status(),
        "indexed_url": report.indexed,
        "failed_url": report.failed,
    })))
}

pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<CreateCollectionRequest>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers, &state.settings.secret_key)?;

    let created = state
        .store
        .create_collection(&request.collection_name)
        .await?;

    if created {
        Ok(Json(json!({
            "status": format!("Collection '{}' created successfully.", request.collection_name)
        })))
    } else {
        Ok(Json(json!({ "error": "Unable to create the collection." })))
    }
}

pub async fn fetch_records(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<FetchRecordsRequest>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers, &state.settings.secret_key)?;

    let records = state
        .store
        .scroll(&request.collection_name, request.limit)
        .await?;

    Ok(Json(json!({ "status": "success", "data": records })))
}

/// Answers the latest user message given the resent conversation history.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&headers, &state.settings.secret_key)?;

    let Some((current, history)) = request.messages.split_last() else {
        return Err(ApiError::BadRequest("user message does not exists.".to_string()));
    };
    if !current.is_user() {
        return Err(ApiError::BadRequest("user message does not exists.".to_string()));
    }

    let outcome = state.query.answer(history, &current.content).await?;

    Ok(Json(json!({
        "response": [{
            "answer": ChatMessage::assistant(outcome.answer),
            "citation": outcome.citations,
        }]
    })))
}
