//! Environment configuration shared by both pipelines.
//!
//! Every value is required and read once at startup; a missing variable
//! fails fast with [`PipelineError::MissingEnv`] naming the variable, so
//! neither pipeline gets as far as a half-configured client.

use std::env;

use crate::types::PipelineError;

/// Connection settings for the remote vector store and the model provider.
#[derive(Clone, Debug)]
pub struct Config {
    pub astra_db_namespace: String,
    pub astra_db_collection: String,
    pub astra_db_api_endpoint: String,
    pub astra_db_application_token: String,
    pub openai_api_key: String,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// Callers are expected to have loaded `.env` (via `dotenvy`) first.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self, PipelineError> {
        let require = |key: &'static str| lookup(key).ok_or(PipelineError::MissingEnv(key));
        Ok(Self {
            astra_db_namespace: require("ASTRA_DB_NAMESPACE")?,
            astra_db_collection: require("ASTRA_DB_COLLECTION")?,
            astra_db_api_endpoint: require("ASTRA_DB_API_ENDPOINT")?,
            astra_db_application_token: require("ASTRA_DB_APPLICATION_TOKEN")?,
            openai_api_key: require("OPENAI_API_KEY")?,
        })
    }
}
