//! HTTP surface: `POST /api/chat`.
//!
//! Each request runs the query pipeline as a strict linear sequence:
//! parse → embed latest message → retrieve top-k → build prompt → stream
//! completion. Failures in the remote calls map to designed JSON error
//! responses instead of falling through to the framework default.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;

use crate::completions::CompletionStreamer;
use crate::embeddings::Embedder;
use crate::prompt::build_prompt;
use crate::stores::VectorStore;
use crate::types::{ChatMessage, PipelineError};

/// Number of nearest chunks retrieved per query.
pub const TOP_K: usize = 10;

/// Long-lived handles shared by all requests. Everything here is safe for
/// concurrent read use; there is no per-request mutable state.
pub struct AppState {
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorStore>,
    pub completions: Arc<dyn CompletionStreamer>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .with_state(state)
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, PipelineError> {
    let latest_message = request
        .messages
        .last()
        .map(|message| message.content.clone())
        .ok_or_else(|| PipelineError::BadRequest("messages must not be empty".to_string()))?;

    let query_vector = state.embedder.embed(&latest_message).await?;
    let documents = state.store.query(&query_vector, TOP_K).await?;

    let doc_context = documents
        .iter()
        .fold(String::new(), |mut acc, document| {
            acc.push_str(&document.text);
            acc.push(' ');
            acc
        });

    let prompt = build_prompt(&doc_context, &latest_message);
    tracing::debug!(
        retrieved = documents.len(),
        prompt_chars = prompt.len(),
        "assembled prompt"
    );

    // Returns as soon as the remote stream is open; tokens are forwarded
    // to the client as they arrive.
    let tokens = state.completions.stream_completion(&prompt).await?;
    let body = Body::from_stream(tokens.map(|token| token.map(Bytes::from)));

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match &self {
            PipelineError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PipelineError::Http(_)
            | PipelineError::Embedding(_)
            | PipelineError::Store(_)
            | PipelineError::Completion(_) => StatusCode::BAD_GATEWAY,
            PipelineError::MissingEnv(_) | PipelineError::InvalidDocument(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        tracing::error!(status = %status, error = %self, "chat request failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completions::MockStreamer;
    use crate::embeddings::MockEmbedder;
    use crate::stores::MemoryStore;

    fn test_state(streamer: MockStreamer) -> Arc<AppState> {
        Arc::new(AppState {
            embedder: Arc::new(MockEmbedder::default()),
            store: Arc::new(MemoryStore::new()),
            completions: Arc::new(streamer),
        })
    }

    #[tokio::test]
    async fn empty_messages_is_a_bad_request() {
        let state = test_state(MockStreamer::new(["ok"]));
        let result = chat(
            State(state),
            Json(ChatRequest {
                messages: Vec::new(),
            }),
        )
        .await;

        let err = result.err().expect("should reject empty messages");
        assert!(matches!(err, PipelineError::BadRequest(_)));
    }

    #[tokio::test]
    async fn error_response_carries_json_body_and_status() {
        let response = PipelineError::Store("down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
