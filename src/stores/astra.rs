//! DataStax Astra DB backend, speaking the JSON Data API over HTTPS.
//!
//! Commands are POSTed as single-key JSON documents: namespace-level
//! commands (`findCollections`, `createCollection`) go to
//! `{endpoint}/api/json/v1/{namespace}`, collection-level commands
//! (`insertOne`, `find`) to `.../{namespace}/{collection}`. Authentication
//! is the application token in a `Token` header.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{ChunkRecord, VectorStore, SIMILARITY_METRIC};
use crate::config::Config;
use crate::embeddings::EMBEDDING_DIMENSIONS;
use crate::types::PipelineError;

/// Client for one Astra DB collection.
#[derive(Clone)]
pub struct AstraStore {
    http: Client,
    namespace_url: Url,
    collection: String,
    token: String,
    dimensions: usize,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(rename = "errorCode", default)]
    error_code: String,
}

impl AstraStore {
    /// Builds a store for `collection` inside `namespace` at `endpoint`.
    pub fn new(
        http: Client,
        endpoint: &str,
        namespace: &str,
        collection: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let base = Url::parse(endpoint)
            .map_err(|err| PipelineError::Store(format!("invalid endpoint url: {err}")))?;
        let namespace_url = base
            .join(&format!("api/json/v1/{namespace}"))
            .map_err(|err| PipelineError::Store(format!("invalid namespace url: {err}")))?;
        Ok(Self {
            http,
            namespace_url,
            collection: collection.into(),
            token: token.into(),
            dimensions: EMBEDDING_DIMENSIONS,
        })
    }

    /// Convenience constructor from the shared environment [`Config`].
    pub fn from_config(http: Client, config: &Config) -> Result<Self, PipelineError> {
        Self::new(
            http,
            &config.astra_db_api_endpoint,
            &config.astra_db_namespace,
            &config.astra_db_collection,
            &config.astra_db_application_token,
        )
    }

    fn collection_url(&self) -> Result<Url, PipelineError> {
        Url::parse(&format!("{}/{}", self.namespace_url, self.collection))
            .map_err(|err| PipelineError::Store(format!("invalid collection url: {err}")))
    }

    /// POSTs one Data API command and surfaces API-level errors.
    async fn command(&self, url: Url, body: Value) -> Result<ApiResponse, PipelineError> {
        let response = self
            .http
            .post(url)
            .header("Token", &self.token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let parsed: ApiResponse = response.json().await?;
        if let Some(err) = parsed.errors.first() {
            return Err(PipelineError::Store(format!(
                "{} ({})",
                err.message, err.error_code
            )));
        }
        Ok(parsed)
    }

    async fn list_collections(&self) -> Result<Vec<String>, PipelineError> {
        let response = self
            .command(self.namespace_url.clone(), json!({ "findCollections": {} }))
            .await?;
        let names = response
            .status
            .get("collections")
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        Ok(names)
    }
}

#[async_trait]
impl VectorStore for AstraStore {
    async fn ensure_collection(&self) -> Result<(), PipelineError> {
        let existing = self.list_collections().await?;
        if existing.iter().any(|name| name == &self.collection) {
            tracing::info!(collection = %self.collection, "collection already exists");
            return Ok(());
        }

        self.command(
            self.namespace_url.clone(),
            json!({
                "createCollection": {
                    "name": self.collection,
                    "options": {
                        "vector": {
                            "dimension": self.dimensions,
                            "metric": SIMILARITY_METRIC,
                        }
                    }
                }
            }),
        )
        .await?;
        tracing::info!(
            collection = %self.collection,
            dimension = self.dimensions,
            metric = SIMILARITY_METRIC,
            "created collection"
        );
        Ok(())
    }

    async fn insert(&self, chunk: ChunkRecord) -> Result<(), PipelineError> {
        self.command(
            self.collection_url()?,
            json!({
                "insertOne": {
                    "document": {
                        "$vector": chunk.vector,
                        "text": chunk.text,
                    }
                }
            }),
        )
        .await?;
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ChunkRecord>, PipelineError> {
        let response = self
            .command(
                self.collection_url()?,
                json!({
                    "find": {
                        "sort": { "$vector": vector },
                        "options": { "limit": k }
                    }
                }),
            )
            .await?;

        let documents = response
            .data
            .get("documents")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            let text = document
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let vector = document
                .get("$vector")
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .filter_map(Value::as_f64)
                        .map(|v| v as f32)
                        .collect()
                })
                .unwrap_or_default();
            records.push(ChunkRecord { text, vector });
        }
        Ok(records)
    }
}
