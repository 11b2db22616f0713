//! Query-answering pipeline: optional history-aware rephrase, similarity
//! search, context assembly, then grounded answer generation. Every step is
//! a single upstream call; any failure aborts the whole request.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::embedding::Embedder;
use crate::errors::ApiError;
use crate::llm::{prompts, ChatModel};
use crate::models::ChatMessage;
use crate::store::VectorStore;

/// Fixed retrieval depth; deliberately not a per-call knob.
const TOP_K: usize = 5;
const CONTEXT_DELIMITER: &str = "\n---\n";

const REPHRASE_TEMPERATURE: f32 = 0.0;
const GENERATE_TEMPERATURE: f32 = 0.3;

#[derive(Debug)]
pub struct QueryOutcome {
    pub answer: String,
    /// Source URLs backing the answer; empty when the model judged the
    /// answer ungrounded (greetings, off-topic queries).
    pub citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RephraseOutput {
    response: String,
}

#[derive(Debug, Deserialize)]
struct AnswerOutput {
    response: String,
    #[serde(deserialize_with = "bool_or_string")]
    is_query_relevant: bool,
}

/// The prompt asks for "true/false", so models return either a JSON bool or
/// the strings "true"/"false" depending on mood.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected true/false, got {other:?}"
            ))),
        },
    }
}

#[derive(Clone)]
pub struct QueryEngine {
    llm: Arc<dyn ChatModel>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
    collection: String,
    min_score: Option<f32>,
}

impl QueryEngine {
    pub fn new(
        llm: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
        collection: String,
        min_score: Option<f32>,
    ) -> Self {
        Self {
            llm,
            embedder,
            store,
            collection,
            min_score,
        }
    }

    /// Answers `query` given the preceding conversation. The rephrased
    /// query is only used for retrieval; generation always sees the
    /// original query.
    pub async fn answer(
        &self,
        history: &[ChatMessage],
        query: &str,
    ) -> Result<QueryOutcome, ApiError> {
        let search_query = if history.is_empty() {
            query.to_string()
        } else {
            self.rephrase(&format_history(history), query).await?
        };

        let embedding = self.embedder.embed(&search_query).await?;
        let mut hits = self.store.search(&self.collection, embedding, TOP_K).await?;
        if let Some(floor) = self.min_score {
            hits.retain(|hit| hit.score >= floor);
        }

        let context = hits
            .iter()
            .map(|hit| hit.payload.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_DELIMITER);
        let links: Vec<String> = hits.into_iter().map(|hit| hit.payload.url).collect();

        let (answer, is_relevant) = self.generate(&context, query).await?;

        let citations = if is_relevant { dedup(links) } else { Vec::new() };
        Ok(QueryOutcome { answer, citations })
    }

    /// Asks the model to rewrite `query` as a self-contained search query
    /// when it depends on the prior chat, or echo it back otherwise.
    async fn rephrase(&self, previous_chat: &str, query: &str) -> Result<String, ApiError> {
        let prompt = prompts::rephrase_prompt(previous_chat, query);
        let raw = self
            .llm
            .complete_json(prompts::SYSTEM_REPHRASE, &prompt, REPHRASE_TEMPERATURE)
            .await?;

        let parsed: RephraseOutput = serde_json::from_str(&raw).map_err(|err| {
            tracing::error!("Error while generating the relevant query for searching: {}", err);
            ApiError::internal(err)
        })?;
        Ok(parsed.response)
    }

    /// Generates the answer from the retrieved context, returning the text
    /// plus the model's judgement of whether it is document-grounded.
    async fn generate(&self, context: &str, query: &str) -> Result<(String, bool), ApiError> {
        let prompt = prompts::generate_prompt(context, query);
        let raw = self
            .llm
            .complete_json(prompts::SYSTEM_GENERATE, &prompt, GENERATE_TEMPERATURE)
            .await?;

        let parsed: AnswerOutput = serde_json::from_str(&raw).map_err(|err| {
            tracing::error!("Error while generating the answer for the given query: {}", err);
            ApiError::internal(err)
        })?;
        Ok((parsed.response, parsed.is_query_relevant))
    }
}

/// Renders prior turns as `role:\ncontent` blocks for the rephrase prompt.
pub fn format_history(messages: &[ChatMessage]) -> String {
    let mut formatted = String::new();
    for message in messages {
        formatted.push_str(&message.role);
        formatted.push_str(":\n");
        formatted.push_str(&message.content);
        formatted.push_str("\n\n");
    }
    formatted
}

fn dedup(links: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for link in links {
        if !seen.contains(&link) {
            seen.push(link);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{RecordPayload, SearchHit};
    use crate::testing::{MockChat, MockEmbedder, MockStore};

    fn hit(url: &str, score: f32) -> SearchHit {
        SearchHit {
            id: format!("id-{url}-{score}"),
            score,
            payload: RecordPayload {
                text: format!("text from {url}"),
                url: url.to_string(),
            },
        }
    }

    fn engine(
        chat: MockChat,
        embedder: MockEmbedder,
        store: MockStore,
        min_score: Option<f32>,
    ) -> (QueryEngine, Arc<MockEmbedder>, Arc<MockChat>) {
        let embedder = Arc::new(embedder);
        let chat = Arc::new(chat);
        let engine = QueryEngine::new(
            chat.clone(),
            embedder.clone(),
            Arc::new(store),
            "col".to_string(),
            min_score,
        );
        (engine, embedder, chat)
    }

    fn relevant_answer(text: &str) -> String {
        format!(r#"{{"response": "{text}", "is_query_relevant": "true"}}"#)
    }

    #[tokio::test]
    async fn empty_history_skips_rephrasing() {
        let store = MockStore::default();
        store.set_hits(vec![hit("http://a", 0.9)]);
        let chat = MockChat::with_responses(vec![relevant_answer("hello answer")]);
        let (engine, embedder, chat) = engine(chat, MockEmbedder::default(), store, None);

        let outcome = engine.answer(&[], "Hello").await.unwrap();

        assert_eq!(outcome.answer, "hello answer");
        // The embedded search query is the user query, verbatim.
        assert_eq!(embedder.last_input(), Some("Hello".to_string()));
        // Only the generation call hit the model.
        assert_eq!(chat.calls(), 1);
    }

    #[tokio::test]
    async fn history_routes_through_rephrasing() {
        let store = MockStore::default();
        store.set_hits(vec![hit("http://a", 0.9)]);
        let chat = MockChat::with_responses(vec![
            r#"{"response": "rust borrow checker"}"#.to_string(),
            relevant_answer("an answer"),
        ]);
        let (engine, embedder, chat) = engine(chat, MockEmbedder::default(), store, None);

        let history = vec![
            ChatMessage {
                role: "user".to_string(),
                content: "tell me about rust".to_string(),
            },
            ChatMessage::assistant("rust is a language"),
        ];
        let outcome = engine.answer(&history, "what about the borrow checker?").await.unwrap();

        assert_eq!(outcome.answer, "an answer");
        assert_eq!(embedder.last_input(), Some("rust borrow checker".to_string()));
        assert_eq!(chat.calls(), 2);
        // Generation receives the original query, not the rephrased one.
        assert!(chat.last_prompt().unwrap().contains("what about the borrow checker?"));
    }

    #[tokio::test]
    async fn duplicate_citation_urls_are_deduplicated() {
        let store = MockStore::default();
        store.set_hits(vec![
            hit("http://a", 0.9),
            hit("http://b", 0.8),
            hit("http://a", 0.7),
        ]);
        let chat = MockChat::with_responses(vec![relevant_answer("grounded")]);
        let (engine, _, _) = engine(chat, MockEmbedder::default(), store, None);

        let outcome = engine.answer(&[], "query").await.unwrap();

        assert_eq!(outcome.citations, vec!["http://a", "http://b"]);
    }

    #[tokio::test]
    async fn irrelevant_answer_gets_no_citations() {
        let store = MockStore::default();
        store.set_hits(vec![hit("http://a", 0.9), hit("http://b", 0.8)]);
        let chat = MockChat::with_responses(vec![
            r#"{"response": "I don't quite get that.", "is_query_relevant": false}"#.to_string(),
        ]);
        let (engine, _, _) = engine(chat, MockEmbedder::default(), store, None);

        let outcome = engine.answer(&[], "unrelated").await.unwrap();

        assert_eq!(outcome.answer, "I don't quite get that.");
        assert!(outcome.citations.is_empty());
    }

    #[tokio::test]
    async fn low_scoring_hits_are_dropped_when_floor_is_set() {
        let store = MockStore::default();
        store.set_hits(vec![hit("http://a", 0.9), hit("http://b", 0.1)]);
        let chat = MockChat::with_responses(vec![relevant_answer("grounded")]);
        let (engine, _, chat) = engine(chat, MockEmbedder::default(), store, Some(0.3));

        let outcome = engine.answer(&[], "query").await.unwrap();

        assert_eq!(outcome.citations, vec!["http://a"]);
        assert!(!chat.last_prompt().unwrap().contains("text from http://b"));
    }

    #[tokio::test]
    async fn malformed_llm_json_is_fatal() {
        let store = MockStore::default();
        store.set_hits(vec![hit("http://a", 0.9)]);
        let chat = MockChat::with_responses(vec!["not json at all".to_string()]);
        let (engine, _, _) = engine(chat, MockEmbedder::default(), store, None);

        let result = engine.answer(&[], "query").await;

        assert!(matches!(result, Err(ApiError::Internal(_))));
    }

    #[tokio::test]
    async fn context_preserves_rank_order_with_delimiter() {
        let store = MockStore::default();
        store.set_hits(vec![hit("http://a", 0.9), hit("http://b", 0.8)]);
        let chat = MockChat::with_responses(vec![relevant_answer("grounded")]);
        let (engine, _, chat) = engine(chat, MockEmbedder::default(), store, None);

        engine.answer(&[], "query").await.unwrap();

        let prompt = chat.last_prompt().unwrap();
        let first = prompt.find("text from http://a").unwrap();
        let second = prompt.find("text from http://b").unwrap();
        assert!(first < second);
        assert!(prompt.contains("\n---\n"));
    }

    #[test]
    fn history_formatting_matches_role_blocks() {
        let history = vec![
            ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            },
            ChatMessage::assistant("hello"),
        ];
        assert_eq!(format_history(&history), "user:\nhi\n\nassistant:\nhello\n\n");
    }

    #[test]
    fn relevance_flag_accepts_bool_and_string() {
        let parsed: AnswerOutput =
            serde_json::from_str(r#"{"response": "a", "is_query_relevant": true}"#).unwrap();
        assert!(parsed.is_query_relevant);

        let parsed: AnswerOutput =
            serde_json::from_str(r#"{"response": "a", "is_query_relevant": "false"}"#).unwrap();
        assert!(!parsed.is_query_relevant);

        let bad = serde_json::from_str::<AnswerOutput>(
            r#"{"response": "a", "is_query_relevant": "maybe"}"#,
        );
        assert!(bad.is_err());
    }
}
