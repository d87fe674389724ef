//! Streaming completion seam.
//!
//! `stream_completion` resolves as soon as the remote stream is open;
//! tokens are yielded as they arrive so the HTTP layer can forward them
//! without buffering the full response. Backpressure from the consumer
//! propagates into the stream instead of accumulating in memory.

use std::pin::Pin;

use async_stream::stream;
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use rig::agent::MultiTurnStreamItem;
use rig::message::Text;
use rig::prelude::*;
use rig::providers::openai;
use rig::streaming::{StreamedAssistantContent, StreamingPrompt};

use crate::types::PipelineError;

/// Completion tokens as they arrive from the model.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, PipelineError>> + Send>>;

/// Chat model used by the query pipeline.
pub const COMPLETION_MODEL: &str = "gpt-3.5-turbo";

/// Submits a prompt and produces an incremental token stream.
#[async_trait]
pub trait CompletionStreamer: Send + Sync {
    /// Opens the stream. A failure before any token is an `Err`; a failure
    /// mid-stream becomes the stream's final item.
    async fn stream_completion(&self, prompt: &str) -> Result<TokenStream, PipelineError>;
}

/// OpenAI-backed streamer using rig's agent streaming API.
#[derive(Clone)]
pub struct OpenAiStreamer {
    client: openai::Client,
    model: String,
}

impl OpenAiStreamer {
    pub fn new(client: openai::Client) -> Self {
        Self {
            client,
            model: COMPLETION_MODEL.to_string(),
        }
    }

    pub fn with_model(client: openai::Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionStreamer for OpenAiStreamer {
    async fn stream_completion(&self, prompt: &str) -> Result<TokenStream, PipelineError> {
        let agent = self.client.agent(&self.model).build();
        let mut upstream = agent.stream_prompt(prompt).await;

        let tokens = stream! {
            while let Some(item) = upstream.next().await {
                match item {
                    Ok(MultiTurnStreamItem::StreamItem(StreamedAssistantContent::Text(
                        Text { text },
                    ))) => yield Ok(text),
                    Ok(_) => { /* reasoning segments, tool calls, final-response markers */ }
                    Err(err) => {
                        yield Err(PipelineError::Completion(err.to_string()));
                        break;
                    }
                }
            }
        };
        Ok(Box::pin(tokens))
    }
}

/// Scripted streamer for tests: records the prompt it was given and
/// replays a fixed token sequence.
#[derive(Clone, Default)]
pub struct MockStreamer {
    tokens: Vec<String>,
    prompts: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl MockStreamer {
    pub fn new(tokens: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            prompts: Default::default(),
        }
    }

    /// Prompts observed so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }
}

#[async_trait]
impl CompletionStreamer for MockStreamer {
    async fn stream_completion(&self, prompt: &str) -> Result<TokenStream, PipelineError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        let tokens = self.tokens.clone();
        Ok(Box::pin(futures_util::stream::iter(
            tokens.into_iter().map(Ok),
        )))
    }
}
