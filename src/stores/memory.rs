//! In-process store with a linear cosine scan.
//!
//! Implements the same contract as the remote backend so tests and local
//! development can run both pipelines without network access.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ChunkRecord, VectorStore};
use crate::types::PipelineError;

#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<ChunkRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn ensure_collection(&self) -> Result<(), PipelineError> {
        // Nothing to create; the backing vec exists for the store's lifetime.
        Ok(())
    }

    async fn insert(&self, chunk: ChunkRecord) -> Result<(), PipelineError> {
        self.records.write().await.push(chunk);
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ChunkRecord>, PipelineError> {
        let records = self.records.read().await;
        let mut scored: Vec<(f32, &ChunkRecord)> = records
            .iter()
            .map(|record| (cosine_similarity(vector, &record.vector), record))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return f32::MIN;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return f32::MIN;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn query_returns_nearest_first() {
        let store = MemoryStore::new();
        store
            .insert(ChunkRecord::new("east", vec![1.0, 0.0]))
            .await
            .unwrap();
        store
            .insert(ChunkRecord::new("north", vec![0.0, 1.0]))
            .await
            .unwrap();
        store
            .insert(ChunkRecord::new("northeast", vec![0.7, 0.7]))
            .await
            .unwrap();

        let results = store.query(&[1.0, 0.1], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "east");
        assert_eq!(results[1].text, "northeast");
    }

    #[tokio::test]
    async fn query_on_empty_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.query(&[1.0, 0.0], 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_inserts_are_kept() {
        let store = MemoryStore::new();
        let chunk = ChunkRecord::new("same", vec![1.0]);
        store.insert(chunk.clone()).await.unwrap();
        store.insert(chunk).await.unwrap();
        assert_eq!(store.len().await, 2);
    }
}
