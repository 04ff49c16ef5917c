use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

/// Where hobby, recommendation and survey data come from
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// REST backend under `api_base_url`
    Network,
    /// Bundled hobby fixture, survey kept in the local store
    Fixture,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the REST API, including the `/api` prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Backend used for catalog, recommendations and survey storage
    #[serde(default = "default_data_source")]
    pub data_source: DataSource,

    /// Directory holding the durable session and survey records
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Number of recommendations requested by default
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_data_source() -> DataSource {
    DataSource::Network
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".hobby-client")
}

fn default_recommendation_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            data_source: default_data_source(),
            storage_dir: default_storage_dir(),
            recommendation_limit: default_recommendation_limit(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
