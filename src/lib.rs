//! ```text
//! Ingestion (offline batch, `bin/ingest`):
//!
//!   Fixed URL list ──► scrape::scrape_pages ──► chunking::TextSplitter
//!                                                        │
//!                                     embeddings::Embedder (per chunk)
//!                                                        │
//!                                     stores::VectorStore::insert
//!
//! Query (online, `bin/serve`, POST /api/chat):
//!
//!   ChatRequest ──► embeddings::Embedder ──► stores::VectorStore::query
//!                                                        │
//!                                     prompt::build_prompt (context + question)
//!                                                        │
//!                                     completions::CompletionStreamer ──► HTTP body
//! ```
//!
//! Both pipelines share one remote vector collection (dimension 1536,
//! cosine metric); nothing else is shared between them.

pub mod chunking;
pub mod completions;
pub mod config;
pub mod embeddings;
pub mod ingestion;
pub mod prompt;
pub mod scrape;
pub mod server;
pub mod stores;
pub mod types;

pub use types::{ChatMessage, PipelineError, Role};
