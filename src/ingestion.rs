//! Offline batch pipeline: scrape → split → embed → insert.
//!
//! Sequential by design: URLs are fetched one at a time, and within a
//! page each chunk is embedded and inserted before the next one starts.
//! Failures are isolated per URL and per chunk; only collection creation
//! failing aborts the run.

use reqwest::Client;
use url::Url;

use crate::chunking::TextSplitter;
use crate::embeddings::Embedder;
use crate::scrape::scrape_pages;
use crate::stores::{ChunkRecord, VectorStore};
use crate::types::PipelineError;

/// Fixed source list. Not externally configurable; the batch takes no
/// arguments.
pub const SOURCE_URLS: &[&str] = &[
    "https://ja.wikipedia.org/wiki/%E6%97%A5%E6%9C%AC%E3%81%AE%E3%83%9C%E3%83%87%E3%82%A3%E3%83%93%E3%83%AB%E3%83%80%E3%83%BC",
    "https://ja.wikipedia.org/wiki/%E6%9C%A8%E6%BE%A4%E5%A4%A7%E7%A5%90",
];

/// Counters from one batch run. Failures show up here and in the logs;
/// partial success is the expected mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub pages_scraped: usize,
    pub pages_failed: usize,
    pub chunks_stored: usize,
    pub chunks_failed: usize,
}

/// Parses the fixed source list.
pub fn source_urls() -> Result<Vec<Url>, PipelineError> {
    SOURCE_URLS
        .iter()
        .map(|raw| Url::parse(raw).map_err(|err| PipelineError::InvalidDocument(err.to_string())))
        .collect()
}

/// Runs the full ingestion batch against `urls`.
///
/// Creates the collection first (a failure there fails the run), then
/// processes pages and chunks best-effort.
pub async fn run(
    client: &Client,
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    splitter: &TextSplitter,
    urls: &[Url],
) -> Result<IngestReport, PipelineError> {
    store.ensure_collection().await?;

    let pages = scrape_pages(client, urls).await;
    let mut report = IngestReport {
        pages_scraped: pages.len(),
        pages_failed: urls.len() - pages.len(),
        ..IngestReport::default()
    };

    for page in pages {
        let chunks = splitter.split(&page.body_html);
        tracing::info!(url = %page.url, chunks = chunks.len(), "splitting page");

        for chunk in chunks {
            match store_chunk(embedder, store, chunk).await {
                Ok(()) => report.chunks_stored += 1,
                Err(err) => {
                    report.chunks_failed += 1;
                    tracing::warn!(url = %page.url, error = %err, "skipping chunk");
                }
            }
        }
    }

    tracing::info!(
        pages_scraped = report.pages_scraped,
        pages_failed = report.pages_failed,
        chunks_stored = report.chunks_stored,
        chunks_failed = report.chunks_failed,
        "ingestion complete"
    );
    Ok(report)
}

async fn store_chunk(
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    chunk: String,
) -> Result<(), PipelineError> {
    let vector = embedder.embed(&chunk).await?;
    store.insert(ChunkRecord::new(chunk, vector)).await
}
