//! Vector store backends for `{vector, text}` chunk records.
//!
//! The [`VectorStore`] trait is the seam both pipelines share: ingestion
//! writes through it, the chat handler reads through it. The production
//! backend is [`astra::AstraStore`] (DataStax Astra's Data API over
//! HTTPS); [`memory::MemoryStore`] provides the same contract in-process
//! for tests and local development.

pub mod astra;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::PipelineError;

pub use astra::AstraStore;
pub use memory::MemoryStore;

/// Similarity metric declared on the collection.
pub const SIMILARITY_METRIC: &str = "cosine";

/// One stored chunk: its text and the vector it was embedded to.
///
/// Identity is implicit; repeated ingestion of the same source re-inserts
/// duplicates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub text: String,
    pub vector: Vec<f32>,
}

impl ChunkRecord {
    pub fn new(text: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            vector,
        }
    }
}

/// Backend-agnostic interface over the shared chunk collection.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates the collection if it does not exist yet.
    ///
    /// Idempotent: existing collection names are checked first and a
    /// second call performs no create side effect.
    async fn ensure_collection(&self) -> Result<(), PipelineError>;

    /// Appends one chunk record. No uniqueness or dedup enforcement.
    async fn insert(&self, chunk: ChunkRecord) -> Result<(), PipelineError>;

    /// Returns the `k` stored records nearest to `vector` by cosine
    /// similarity, nearest first. Tie-break order is the backend's.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ChunkRecord>, PipelineError>;
}
