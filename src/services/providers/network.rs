/// REST-backed providers
///
/// Thin adapters over [`ApiClient`]: the backend owns filtering, scoring and
/// persistence, so these only forward requests and log what came back.
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    api::ApiClient,
    error::AppResult,
    models::{
        CategoryCount, Hobby, HobbyDetail, HobbyFilters, HobbyId, PopularHobby, RatingRequest,
        RatingResult, ScoredHobby, SimilarHobby, SurveyResponse,
    },
    services::providers::{HobbyCatalog, RecommendationEngine, SurveyStore},
};

const PROVIDER_NAME: &str = "network";

#[derive(Clone)]
pub struct NetworkBackend {
    api: Arc<ApiClient>,
}

impl NetworkBackend {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl HobbyCatalog for NetworkBackend {
    async fn list_hobbies(&self, filters: &HobbyFilters) -> AppResult<Vec<Hobby>> {
        let hobbies = self.api.hobbies(filters).await?;
        tracing::debug!(count = hobbies.len(), ?filters, "Fetched hobbies");
        Ok(hobbies)
    }

    async fn hobby_detail(&self, hobby_id: HobbyId) -> AppResult<HobbyDetail> {
        self.api.hobby_detail(hobby_id).await
    }

    async fn categories(&self) -> AppResult<Vec<CategoryCount>> {
        self.api.categories().await
    }

    async fn rate_hobby(
        &self,
        hobby_id: HobbyId,
        rating: &RatingRequest,
    ) -> AppResult<RatingResult> {
        self.api.rate_hobby(hobby_id, rating).await
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[async_trait]
impl RecommendationEngine for NetworkBackend {
    async fn recommend(&self, limit: usize) -> AppResult<Vec<ScoredHobby>> {
        self.api.recommendations(limit).await
    }

    async fn popular(&self, limit: usize) -> AppResult<Vec<PopularHobby>> {
        self.api.popular_hobbies(limit).await
    }

    async fn similar(&self, hobby_id: HobbyId, limit: usize) -> AppResult<Vec<SimilarHobby>> {
        self.api.similar_hobbies(hobby_id, limit).await
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[async_trait]
impl SurveyStore for NetworkBackend {
    async fn submit(&self, responses: &SurveyResponse) -> AppResult<()> {
        self.api.submit_survey(responses).await
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
