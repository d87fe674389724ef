//! Batch ingestion entry point.
//!
//! Scrapes the fixed source list, chunks and embeds the page bodies, and
//! upserts the vectors into the configured Astra DB collection. Takes no
//! arguments; configuration comes from the environment (`.env` supported).
//!
//! Run with:
//!   cargo run --bin ingest

use reqwest::Client;
use rig::providers::openai;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use musclechat::chunking::TextSplitter;
use musclechat::config::Config;
use musclechat::embeddings::OpenAiEmbedder;
use musclechat::ingestion;
use musclechat::stores::AstraStore;
use musclechat::types::PipelineError;

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let http = Client::builder()
        .user_agent("musclechat-ingest/0.1")
        .use_rustls_tls()
        .build()?;

    let openai_client = openai::Client::new(&config.openai_api_key);
    let embedder = OpenAiEmbedder::new(&openai_client);
    let store = AstraStore::from_config(http.clone(), &config)?;
    let splitter = TextSplitter::ingestion_default();
    let urls = ingestion::source_urls()?;

    let report = ingestion::run(&http, &embedder, &store, &splitter, &urls).await?;

    println!("Ingestion complete");
    println!("  pages scraped : {}", report.pages_scraped);
    println!("  pages failed  : {}", report.pages_failed);
    println!("  chunks stored : {}", report.chunks_stored);
    println!("  chunks failed : {}", report.chunks_failed);

    Ok(())
}
