//! Retrieval-augmented generation pipelines.
//!
//! - `chunker`: sentence-window splitting of scraped text
//! - `indexer`: scrape → chunk → embed → upsert, per URL
//! - `query`: rephrase → search → assemble context → generate

pub mod chunker;
mod indexer;
mod query;

pub use indexer::{IndexReport, Indexer};
pub use query::{QueryEngine, QueryOutcome};
