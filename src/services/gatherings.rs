use std::sync::Arc;

use crate::{
    api::ApiClient,
    error::{AppError, AppResult},
    models::{Gathering, GatheringFilters, GatheringId, NewGathering, RegionCount},
    services::load::Load,
};

/// Checks the fields the backend requires before anything is sent
pub fn validate_new_gathering(gathering: &NewGathering) -> AppResult<()> {
    let mut missing = Vec::new();
    if gathering.hobby_id.is_none() {
        missing.push("hobby_id");
    }
    if gathering.name.trim().is_empty() {
        missing.push("name");
    }
    if gathering.region.trim().is_empty() {
        missing.push("region");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Gathering list, detail and creation
///
/// Gatherings are only served by the backend, so this talks to the API
/// client directly whatever `DATA_SOURCE` says.
pub struct GatheringBrowser {
    api: Arc<ApiClient>,
    filters: GatheringFilters,
    gatherings: Load<Vec<Gathering>>,
}

impl GatheringBrowser {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            filters: GatheringFilters::default(),
            gatherings: Load::Pending,
        }
    }

    pub fn filters(&self) -> &GatheringFilters {
        &self.filters
    }

    pub fn gatherings(&self) -> &Load<Vec<Gathering>> {
        &self.gatherings
    }

    pub async fn apply(&mut self, filters: GatheringFilters) -> &Load<Vec<Gathering>> {
        self.filters = filters;
        self.gatherings = Load::Pending;
        let result = self.api.gatherings(&self.filters).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Failed to load gatherings");
        }
        self.gatherings = result.into();
        &self.gatherings
    }

    pub async fn detail(&self, gathering_id: GatheringId) -> AppResult<Gathering> {
        self.api.gathering_detail(gathering_id).await
    }

    pub async fn regions(&self) -> AppResult<Vec<RegionCount>> {
        self.api.regions().await
    }

    pub async fn create(&self, gathering: &NewGathering) -> AppResult<Gathering> {
        validate_new_gathering(gathering)?;
        if !self.api.session().is_authenticated() {
            return Err(AppError::InvalidInput(
                "Log in to create a gathering.".to_string(),
            ));
        }

        let created = self.api.create_gathering(gathering).await?;
        tracing::info!(
            gathering_id = created.gathering_id,
            hobby_id = created.hobby_id,
            "Gathering created"
        );
        Ok(created)
    }
}
