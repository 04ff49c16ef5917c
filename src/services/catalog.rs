use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CategoryCount, Hobby, HobbyDetail, HobbyFilters, HobbyId, RatingRequest, RatingResult},
    services::{load::Load, providers::HobbyCatalog},
};

/// Filterable hobby list plus detail lookups
///
/// Every filter change refetches from the catalog; results are never cached
/// between calls.
pub struct CatalogBrowser {
    catalog: Arc<dyn HobbyCatalog>,
    filters: HobbyFilters,
    hobbies: Load<Vec<Hobby>>,
}

impl CatalogBrowser {
    pub fn new(catalog: Arc<dyn HobbyCatalog>) -> Self {
        Self {
            catalog,
            filters: HobbyFilters::default(),
            hobbies: Load::Pending,
        }
    }

    pub fn filters(&self) -> &HobbyFilters {
        &self.filters
    }

    pub fn hobbies(&self) -> &Load<Vec<Hobby>> {
        &self.hobbies
    }

    /// Replaces the filter record and fetches the matching hobbies
    pub async fn apply(&mut self, filters: HobbyFilters) -> &Load<Vec<Hobby>> {
        self.filters = filters;
        self.refresh().await
    }

    /// Refetches with the current filters
    pub async fn refresh(&mut self) -> &Load<Vec<Hobby>> {
        self.hobbies = Load::Pending;
        let result = self.catalog.list_hobbies(&self.filters).await;
        if let Err(e) = &result {
            tracing::warn!(provider = self.catalog.name(), error = %e, "Failed to load hobbies");
        }
        self.hobbies = result.into();
        &self.hobbies
    }

    pub async fn categories(&self) -> AppResult<Vec<CategoryCount>> {
        self.catalog.categories().await
    }

    pub async fn detail(&self, hobby_id: HobbyId) -> AppResult<HobbyDetail> {
        self.catalog.hobby_detail(hobby_id).await
    }

    /// Validates and submits a rating for one hobby
    pub async fn rate(&self, hobby_id: HobbyId, rating: &RatingRequest) -> AppResult<RatingResult> {
        rating.validate()?;
        self.catalog.rate_hobby(hobby_id, rating).await
    }
}
