use std::sync::Arc;

use async_trait::async_trait;

/// Hobby data provider abstraction
///
/// The catalog, the recommendation engine and the survey store each sit
/// behind a trait with two implementations: one that talks to the REST
/// backend and one that serves the bundled fixture catalog with local
/// persistence. `DATA_SOURCE` picks one implementation for all three so a
/// survey submitted through a store is always visible to the engine that
/// ranks against it.
use crate::{
    api::ApiClient,
    config::{Config, DataSource},
    error::AppResult,
    models::{
        CategoryCount, Hobby, HobbyDetail, HobbyFilters, HobbyId, PopularHobby, RatingRequest,
        RatingResult, ScoredHobby, SimilarHobby, SurveyResponse,
    },
    storage::LocalStore,
};

pub mod fixture;
pub mod network;

pub use fixture::FixtureBackend;
pub use network::NetworkBackend;

/// Default number of recommendations and popular hobbies
pub const DEFAULT_LIMIT: usize = 10;

/// Upper bound on recommendations and popular hobbies per request
pub const MAX_LIMIT: usize = 50;

/// Default number of similar hobbies
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// Upper bound on similar hobbies per request
pub const MAX_SIMILAR_LIMIT: usize = 20;

/// Browsable hobby catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HobbyCatalog: Send + Sync {
    /// Hobbies matching every set filter, in catalog order
    async fn list_hobbies(&self, filters: &HobbyFilters) -> AppResult<Vec<Hobby>>;

    /// One hobby with its most recent reviews
    async fn hobby_detail(&self, hobby_id: HobbyId) -> AppResult<HobbyDetail>;

    async fn categories(&self) -> AppResult<Vec<CategoryCount>>;

    /// Records or replaces the current user's rating and returns the new aggregate
    async fn rate_hobby(&self, hobby_id: HobbyId, rating: &RatingRequest)
        -> AppResult<RatingResult>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Source of ranked hobby lists
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationEngine: Send + Sync {
    /// Personal recommendations, best match first.
    ///
    /// Fails with `AppError::SurveyRequired` when no survey record exists.
    async fn recommend(&self, limit: usize) -> AppResult<Vec<ScoredHobby>>;

    /// Highest Bayesian-averaged ratings first
    async fn popular(&self, limit: usize) -> AppResult<Vec<PopularHobby>>;

    /// Hobbies most like `hobby_id`, excluding itself
    async fn similar(&self, hobby_id: HobbyId, limit: usize) -> AppResult<Vec<SimilarHobby>>;

    fn name(&self) -> &'static str;
}

/// Destination of a completed survey
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SurveyStore: Send + Sync {
    async fn submit(&self, responses: &SurveyResponse) -> AppResult<()>;

    fn name(&self) -> &'static str;
}

/// The three providers selected for one configuration
#[derive(Clone)]
pub struct Providers {
    pub catalog: Arc<dyn HobbyCatalog>,
    pub engine: Arc<dyn RecommendationEngine>,
    pub surveys: Arc<dyn SurveyStore>,
}

impl Providers {
    pub fn from_config(
        config: &Config,
        api: Arc<ApiClient>,
        store: Arc<dyn LocalStore>,
    ) -> AppResult<Self> {
        let providers = match config.data_source {
            DataSource::Network => Self::shared(Arc::new(NetworkBackend::new(api))),
            DataSource::Fixture => Self::shared(Arc::new(FixtureBackend::bundled(store)?)),
        };

        tracing::info!(
            catalog = providers.catalog.name(),
            engine = providers.engine.name(),
            surveys = providers.surveys.name(),
            "Data providers selected"
        );

        Ok(providers)
    }

    /// Uses one backend for all three roles
    fn shared<B>(backend: Arc<B>) -> Self
    where
        B: HobbyCatalog + RecommendationEngine + SurveyStore + 'static,
    {
        Self {
            catalog: backend.clone(),
            engine: backend.clone(),
            surveys: backend,
        }
    }
}

/// Clamps a requested list length into `1..=max`, treating 0 as "default"
pub fn clamp_limit(limit: usize, default: usize, max: usize) -> usize {
    if limit == 0 {
        default.min(max)
    } else {
        limit.min(max)
    }
}
