//! In-memory fakes for the external-service seams, shared across unit
//! tests. Each one records enough of what it saw for assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Settings;
use crate::embedding::Embedder;
use crate::errors::ApiError;
use crate::llm::ChatModel;
use crate::scrape::Scraper;
use crate::state::AppState;
use crate::store::{NewRecord, SearchHit, StoredRecord, VectorStore};

pub fn test_settings() -> Settings {
    Settings {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: "unit-test-secret".to_string(),
        firecrawl_api_key: "fc-test".to_string(),
        firecrawl_base_url: "http://firecrawl.invalid".to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_base_url: "http://openai.invalid".to_string(),
        qdrant_url: "http://qdrant.invalid:6334".to_string(),
        qdrant_api_key: None,
        default_collection: "test-collection".to_string(),
        admin_username: "admin".to_string(),
        admin_password: "password".to_string(),
        min_score: None,
    }
}

pub fn test_state() -> Arc<AppState> {
    test_state_with(MockScraper::default(), MockChat::default(), Arc::new(MockStore::default()))
}

pub fn test_state_with(
    scraper: MockScraper,
    chat: MockChat,
    store: Arc<MockStore>,
) -> Arc<AppState> {
    AppState::with_clients(
        test_settings(),
        Arc::new(scraper),
        Arc::new(MockEmbedder::default()),
        Arc::new(chat),
        store,
    )
}

#[derive(Default)]
pub struct MockScraper {
    pages: HashMap<String, String>,
}

impl MockScraper {
    pub fn set_page(&mut self, url: &str, markdown: String) {
        self.pages.insert(url.to_string(), markdown);
    }
}

#[async_trait]
impl Scraper for MockScraper {
    async fn scrape_markdown(&self, url: &str) -> Result<String, ApiError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ApiError::Internal(format!("scrape failed for {url}")))
    }
}

pub struct MockEmbedder {
    dimension: usize,
    last_input: Mutex<Option<String>>,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self {
            dimension: 8,
            last_input: Mutex::new(None),
        }
    }
}

impl MockEmbedder {
    pub fn last_input(&self) -> Option<String> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ApiError> {
        *self.last_input.lock().unwrap() = Some(text.to_string());
        Ok(vec![0.1; self.dimension])
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Replays canned completions in order and records every prompt it saw.
#[derive(Default)]
pub struct MockChat {
    responses: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl MockChat {
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatModel for MockChat {
    async fn complete_json(
        &self,
        _system: &str,
        prompt: &str,
        _temperature: f32,
    ) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ApiError::Internal("no canned response left".to_string()));
        }
        Ok(responses.remove(0))
    }
}

#[derive(Default)]
pub struct MockStore {
    hits: Mutex<Vec<SearchHit>>,
    upserts: Mutex<HashMap<String, Vec<NewRecord>>>,
    collections: Mutex<Vec<String>>,
    fail_writes: bool,
}

impl MockStore {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn set_hits(&self, hits: Vec<SearchHit>) {
        *self.hits.lock().unwrap() = hits;
    }

    pub fn upserted(&self, collection: &str) -> Vec<NewRecord> {
        self.upserts
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn created_collections(&self) -> Vec<String> {
        self.collections.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for MockStore {
    async fn create_collection(&self, name: &str) -> Result<bool, ApiError> {
        if self.fail_writes {
            return Err(ApiError::Internal("collection create failed".to_string()));
        }
        self.collections.lock().unwrap().push(name.to_string());
        Ok(true)
    }

    async fn upsert(&self, collection: &str, records: Vec<NewRecord>) -> Result<(), ApiError> {
        if self.fail_writes {
            return Err(ApiError::Internal("upsert failed".to_string()));
        }
        self.upserts
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .extend(records);
        Ok(())
    }

    async fn search(
        &self,
        _collection: &str,
        _vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ApiError> {
        let hits = self.hits.lock().unwrap();
        Ok(hits.iter().take(limit).cloned().collect())
    }

    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<StoredRecord>, ApiError> {
        Ok(self
            .upserted(collection)
            .into_iter()
            .take(limit)
            .map(|record| StoredRecord {
                id: record.id,
                payload: record.payload,
            })
            .collect())
    }
}
