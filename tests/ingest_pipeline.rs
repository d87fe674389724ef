//! Ingestion batch tests against a mock web server and in-process store.

use async_trait::async_trait;
use httpmock::prelude::*;
use reqwest::Client;
use url::Url;

use musclechat::chunking::TextSplitter;
use musclechat::embeddings::MockEmbedder;
use musclechat::ingestion;
use musclechat::stores::{ChunkRecord, MemoryStore, VectorStore};
use musclechat::types::PipelineError;

fn page(body: &str) -> String {
    format!("<html><head><title>t</title></head><body>{body}</body></html>")
}

#[tokio::test]
async fn failing_url_does_not_stop_the_batch() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/good-one");
            then.status(200).body(page("<p>First article body.</p>"));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/broken");
            then.status(503);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/good-two");
            then.status(200).body(page("<p>Second article body.</p>"));
        })
        .await;

    let urls = vec![
        Url::parse(&server.url("/good-one")).unwrap(),
        Url::parse(&server.url("/broken")).unwrap(),
        Url::parse(&server.url("/good-two")).unwrap(),
    ];

    let store = MemoryStore::new();
    let embedder = MockEmbedder::default();
    let splitter = TextSplitter::ingestion_default();
    let client = Client::new();

    let report = ingestion::run(&client, &embedder, &store, &splitter, &urls)
        .await
        .unwrap();

    assert_eq!(report.pages_scraped, 2);
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.chunks_failed, 0);
    // Both short pages fit in a single chunk each.
    assert_eq!(report.chunks_stored, 2);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn stored_chunks_carry_page_text_and_vectors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/article");
            then.status(200)
                .body(page("<h1>木澤大祐</h1><p>日本のボディビルダー。</p>"));
        })
        .await;

    let urls = vec![Url::parse(&server.url("/article")).unwrap()];
    let store = MemoryStore::new();
    let embedder = MockEmbedder::default();
    let splitter = TextSplitter::ingestion_default();

    ingestion::run(&Client::new(), &embedder, &store, &splitter, &urls)
        .await
        .unwrap();

    let probe = vec![0.5; 8];
    let records = store.query(&probe, 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].text.contains("木澤大祐"));
    assert_eq!(records[0].vector.len(), 8);
}

#[tokio::test]
async fn long_pages_produce_overlapping_chunks() {
    let filler = "筋トレ ".repeat(300);
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/long");
            then.status(200).body(page(&format!("<p>{filler}</p>")));
        })
        .await;

    let urls = vec![Url::parse(&server.url("/long")).unwrap()];
    let store = MemoryStore::new();

    let report = ingestion::run(
        &Client::new(),
        &MockEmbedder::default(),
        &store,
        &TextSplitter::ingestion_default(),
        &urls,
    )
    .await
    .unwrap();

    assert!(report.chunks_stored > 1, "long page should split: {report:?}");
    assert_eq!(store.len().await, report.chunks_stored);
}

struct UncreatableStore;

#[async_trait]
impl VectorStore for UncreatableStore {
    async fn ensure_collection(&self) -> Result<(), PipelineError> {
        Err(PipelineError::Store("createCollection denied".to_string()))
    }

    async fn insert(&self, _chunk: ChunkRecord) -> Result<(), PipelineError> {
        panic!("insert must not be reached when collection creation fails");
    }

    async fn query(&self, _vector: &[f32], _k: usize) -> Result<Vec<ChunkRecord>, PipelineError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn collection_creation_failure_fails_the_run() {
    let result = ingestion::run(
        &Client::new(),
        &MockEmbedder::default(),
        &UncreatableStore,
        &TextSplitter::ingestion_default(),
        &[],
    )
    .await;

    assert!(matches!(result, Err(PipelineError::Store(_))));
}
