pub mod auth;
pub mod config;
pub mod embedding;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod scrape;
pub mod server;
pub mod state;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
