use std::sync::Arc;

use crate::config::{Settings, EMBEDDING_MODEL_NAME, OPENAI_LLM_MODEL, VECTOR_DIMENSION};
use crate::embedding::{Embedder, OpenAiEmbedder};
use crate::llm::{ChatModel, OpenAiChat};
use crate::rag::{Indexer, QueryEngine};
use crate::scrape::{FirecrawlScraper, Scraper};
use crate::store::{QdrantStore, VectorStore};

/// Process-wide shared state: configuration plus the upstream clients,
/// built once at startup and injected into the pipelines.
pub struct AppState {
    pub settings: Settings,
    pub indexer: Indexer,
    pub query: QueryEngine,
    pub store: Arc<dyn VectorStore>,
}

impl AppState {
    pub fn initialize(settings: Settings) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn VectorStore> = Arc::new(QdrantStore::connect(
            &settings.qdrant_url,
            settings.qdrant_api_key.clone(),
            VECTOR_DIMENSION,
        )?);
        let scraper: Arc<dyn Scraper> = Arc::new(FirecrawlScraper::new(
            settings.firecrawl_base_url.clone(),
            settings.firecrawl_api_key.clone(),
        ));
        let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::new(
            settings.openai_base_url.clone(),
            settings.openai_api_key.clone(),
            EMBEDDING_MODEL_NAME.to_string(),
            VECTOR_DIMENSION,
        ));
        let llm: Arc<dyn ChatModel> = Arc::new(OpenAiChat::new(
            settings.openai_base_url.clone(),
            settings.openai_api_key.clone(),
            OPENAI_LLM_MODEL.to_string(),
        ));

        Ok(Self::with_clients(settings, scraper, embedder, llm, store))
    }

    /// Wires the pipelines up from explicit clients. `initialize` uses the
    /// real ones; tests pass fakes.
    pub fn with_clients(
        settings: Settings,
        scraper: Arc<dyn Scraper>,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn ChatModel>,
        store: Arc<dyn VectorStore>,
    ) -> Arc<Self> {
        let indexer = Indexer::new(scraper, embedder.clone(), store.clone());
        let query = QueryEngine::new(
            llm,
            embedder,
            store.clone(),
            settings.default_collection.clone(),
            settings.min_score,
        );

        Arc::new(AppState {
            settings,
            indexer,
            query,
            store,
        })
    }
}
