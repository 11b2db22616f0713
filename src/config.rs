//! Process configuration, loaded once at startup from `rag.env` / the
//! environment. Model names and the vector dimension are deployment
//! constants rather than tunables.

use std::env;

use anyhow::Context;

pub const EMBEDDING_MODEL_NAME: &str = "text-embedding-3-small";
pub const OPENAI_LLM_MODEL: &str = "gpt-4o-mini";
pub const VECTOR_DIMENSION: usize = 1536;
pub const DEFAULT_COLLECTION_NAME: &str = "chatbot-rag-db-collection-v1";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev";
const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub secret_key: String,
    pub firecrawl_api_key: String,
    pub firecrawl_base_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub default_collection: String,
    pub admin_username: String,
    pub admin_password: String,
    /// Similarity floor for retrieved chunks; hits below it are dropped
    /// before context assembly. Unset means no filtering.
    pub min_score: Option<f32>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        // Matches the env file the companion tooling writes.
        let _ = dotenvy::from_filename("rag.env");

        let min_score = match env::var("RAG_MIN_SCORE") {
            Ok(raw) => Some(
                raw.parse::<f32>()
                    .context("RAG_MIN_SCORE must be a float")?,
            ),
            Err(_) => None,
        };

        Ok(Settings {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|val| val.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            secret_key: env::var("SECRET_KEY").context("SECRET_KEY is not set")?,
            firecrawl_api_key: env::var("FIRECRAWL_API_KEY")
                .context("FIRECRAWL_API_KEY is not set")?,
            firecrawl_base_url: env::var("FIRECRAWL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FIRECRAWL_BASE_URL.to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            qdrant_url: env::var("QDRANT_URL").unwrap_or_else(|_| DEFAULT_QDRANT_URL.to_string()),
            qdrant_api_key: env::var("QDRANT_API_KEY").ok().filter(|key| !key.is_empty()),
            default_collection: env::var("DEFAULT_COLLECTION_NAME")
                .unwrap_or_else(|_| DEFAULT_COLLECTION_NAME.to_string()),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "password".to_string()),
            min_score,
        })
    }
}
