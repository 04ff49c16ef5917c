use std::sync::Arc;

use crate::{
    api::ApiClient,
    config::Config,
    error::AppResult,
    services::Providers,
    session::Session,
    storage::{FileStore, LocalStore},
};

/// Shared application state
///
/// Everything a command needs: the restored session, the API client that
/// reads it, and the data providers selected by the configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub session: Arc<Session>,
    pub api: Arc<ApiClient>,
    pub providers: Providers,
}

impl AppState {
    /// Opens the file store under `storage_dir` and wires everything to it
    pub fn from_config(config: Config) -> AppResult<Self> {
        let store: Arc<dyn LocalStore> = Arc::new(FileStore::open(config.storage_dir.clone())?);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn LocalStore>) -> AppResult<Self> {
        let session = Arc::new(Session::restore(Arc::clone(&store))?);
        let api = Arc::new(ApiClient::new(&config, Arc::clone(&session))?);
        let providers = Providers::from_config(&config, Arc::clone(&api), store)?;

        Ok(Self {
            config,
            session,
            api,
            providers,
        })
    }
}
