//! Indexing pipeline: scrape each URL, chunk the markdown, embed every
//! chunk and batch-upsert the vectors. URLs are processed sequentially and
//! independently; one bad URL never aborts the batch.

use std::sync::Arc;

use uuid::Uuid;

use super::chunker::{chunk_text, CHUNK_SENTENCES, OVERLAP_SENTENCES};
use crate::embedding::Embedder;
use crate::errors::ApiError;
use crate::scrape::Scraper;
use crate::store::{NewRecord, RecordPayload, VectorStore};

/// Per-batch outcome. `indexed` and `failed` partition the input URLs.
#[derive(Debug, Default)]
pub struct IndexReport {
    pub indexed: Vec<String>,
    pub failed: Vec<String>,
}

impl IndexReport {
    pub fn status(&self) -> &'static str {
        if self.failed.is_empty() {
            "success"
        } else {
            "failure"
        }
    }
}

#[derive(Clone)]
pub struct Indexer {
    scraper: Arc<dyn Scraper>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl Indexer {
    pub fn new(
        scraper: Arc<dyn Scraper>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            scraper,
            embedder,
            store,
        }
    }

    /// Indexes each URL's content into `collection`. Failures are recorded
    /// per URL rather than propagated, so the report always covers every
    /// input.
    pub async fn index_urls(&self, urls: &[String], collection: &str) -> IndexReport {
        let mut report = IndexReport::default();

        for url in urls {
            match self.index_one(url, collection).await {
                Ok(chunks) => {
                    tracing::info!("Indexed {} chunks from {}", chunks, url);
                    report.indexed.push(url.clone());
                }
                Err(err) => {
                    tracing::error!("Error while inserting url into the vector DB: {}", err);
                    report.failed.push(url.clone());
                }
            }
        }

        report
    }

    async fn index_one(&self, url: &str, collection: &str) -> Result<usize, ApiError> {
        let markdown = self.scraper.scrape_markdown(url).await?;

        let mut records = Vec::new();
        for chunk in chunk_text(&markdown, CHUNK_SENTENCES, OVERLAP_SENTENCES) {
            let vector = self.embedder.embed(&chunk).await?;
            records.push(NewRecord {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: RecordPayload {
                    text: chunk,
                    url: url.to_string(),
                },
            });
        }

        let count = records.len();
        if count > 0 {
            self.store.upsert(collection, records).await?;
        }
        Ok(count)
    }
}
