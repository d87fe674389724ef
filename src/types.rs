//! Shared types: the error taxonomy and the transient chat message model.

use serde::{Deserialize, Serialize};

/// Unified error type for both pipelines.
///
/// The ingestion pipeline recovers from most of these (logging and moving
/// on to the next URL or chunk); the query pipeline maps them to HTTP
/// error responses in [`crate::server`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required environment variable was not set.
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    /// Transport-level failure talking to a remote service.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A fetched document could not be used (bad URL, no `<body>`, ...).
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// The embedding service failed or returned an unusable vector.
    #[error("embedding failed: {0}")]
    Embedding(String),

    /// The vector store rejected a request or returned an error payload.
    #[error("vector store error: {0}")]
    Store(String),

    /// The completion service failed before or during streaming.
    #[error("completion failed: {0}")]
    Completion(String),

    /// The caller supplied an unusable request body.
    #[error("bad request: {0}")]
    BadRequest(String),
}

/// Role of a chat participant, as supplied per request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
    Assistant,
}

/// One message of the chat history. Transient: supplied per request,
/// never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
