pub mod auth;
pub mod rag;
