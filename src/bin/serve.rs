//! Chat server entry point.
//!
//! Exposes `POST /api/chat` and streams model completions grounded in the
//! ingested collection. Client handles are constructed once at startup and
//! shared across requests.
//!
//! Run with:
//!   cargo run --bin serve
//! Then:
//!   curl -N -X POST http://127.0.0.1:3000/api/chat \
//!     -H 'content-type: application/json' \
//!     -d '{"messages":[{"role":"user","content":"木澤大祐について教えて"}]}'

use std::env;
use std::sync::Arc;

use reqwest::Client;
use rig::providers::openai;
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use musclechat::completions::OpenAiStreamer;
use musclechat::config::Config;
use musclechat::embeddings::OpenAiEmbedder;
use musclechat::server::{self, AppState};
use musclechat::stores::AstraStore;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let http = Client::builder()
        .user_agent("musclechat-serve/0.1")
        .use_rustls_tls()
        .build()?;

    let openai_client = openai::Client::new(&config.openai_api_key);
    let state = Arc::new(AppState {
        embedder: Arc::new(OpenAiEmbedder::new(&openai_client)),
        store: Arc::new(AstraStore::from_config(http, &config)?),
        completions: Arc::new(OpenAiStreamer::new(openai_client)),
    });

    let addr = env::var("MUSCLECHAT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("serving chat endpoint on http://{addr}/api/chat");
    axum::serve(listener, server::router(state).into_make_service()).await?;

    Ok(())
}
