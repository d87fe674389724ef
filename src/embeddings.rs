//! Embedding seam shared by ingestion and query.
//!
//! Both pipelines must embed with the same model identifier and dimension
//! or similarity search is meaningless; the trait carries the dimension so
//! stores can check vectors against the collection they were created with.

use async_trait::async_trait;
use rig::embeddings::EmbeddingModel;
use rig::prelude::*;
use rig::providers::openai;

use crate::types::PipelineError;

/// Vector dimension of `text-embedding-3-small`, and of the collection.
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Maps text to a fixed-length dense vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a single text. Errors propagate to the caller: ingestion
    /// logs and skips the chunk, the query path fails the request.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError>;

    /// Dimension of every vector this embedder produces.
    fn dimensions(&self) -> usize;
}

/// Remote embedder backed by OpenAI's `text-embedding-3-small`.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    model: openai::EmbeddingModel,
}

impl OpenAiEmbedder {
    pub fn new(client: &openai::Client) -> Self {
        Self {
            model: client.embedding_model(openai::TEXT_EMBEDDING_3_SMALL),
        }
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let embedding = self
            .model
            .embed_text(text)
            .await
            .map_err(|err| PipelineError::Embedding(err.to_string()))?;
        let vector: Vec<f32> = embedding.vec.into_iter().map(|v| v as f32).collect();
        if vector.len() != EMBEDDING_DIMENSIONS {
            return Err(PipelineError::Embedding(format!(
                "model returned {} dimensions, expected {EMBEDDING_DIMENSIONS}",
                vector.len()
            )));
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }
}

/// Deterministic hash-derived embedder for tests and offline runs.
///
/// Identical text always produces the identical vector, which keeps
/// retrieval ordering reproducible without a network dependency.
#[derive(Clone, Debug)]
pub struct MockEmbedder {
    dimensions: usize,
}

impl MockEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        Ok(hash_to_vec(text, self.dimensions))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

fn hash_to_vec(text: &str, dimensions: usize) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let seed = hasher.finish();
    (0..dimensions)
        .map(|i| {
            let bits = seed.rotate_left((i * 8) as u32) ^ ((i as u64) << 24);
            (bits as f32) / u32::MAX as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_embedder_is_deterministic() {
        let embedder = MockEmbedder::default();
        let first = embedder.embed("Hello world").await.unwrap();
        let again = embedder.embed("Hello world").await.unwrap();
        let other = embedder.embed("Goodbye world").await.unwrap();

        assert_eq!(first, again, "identical text must embed identically");
        assert_ne!(first, other, "different text should embed differently");
        assert_eq!(first.len(), embedder.dimensions());
    }
}
