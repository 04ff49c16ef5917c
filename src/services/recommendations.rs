use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{HobbyId, MatchScore, PopularHobby, Recommendation, ScoredHobby, SimilarHobby},
    services::{
        load::Load,
        providers::{
            clamp_limit, RecommendationEngine, DEFAULT_LIMIT, DEFAULT_SIMILAR_LIMIT, MAX_LIMIT,
            MAX_SIMILAR_LIMIT,
        },
    },
};

/// Visual emphasis of a list position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// First place
    TopPick,
    /// Second place
    RunnerUp,
    Ranked,
}

impl Badge {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => Badge::TopPick,
            2 => Badge::RunnerUp,
            _ => Badge::Ranked,
        }
    }
}

impl Recommendation {
    pub fn badge(&self) -> Badge {
        Badge::for_rank(self.rank)
    }
}

/// Numbers entries 1.. in arrival order
pub fn assign_ranks(scored: Vec<ScoredHobby>) -> Vec<Recommendation> {
    scored
        .into_iter()
        .enumerate()
        .map(|(index, entry)| Recommendation {
            rank: index + 1,
            match_score: MatchScore::from_percent(entry.match_percentage),
            hobby: entry.hobby,
        })
        .collect()
}

/// Personal recommendation list
pub struct RecommendationView {
    engine: Arc<dyn RecommendationEngine>,
    limit: usize,
    recommendations: Load<Vec<Recommendation>>,
}

impl RecommendationView {
    pub fn new(engine: Arc<dyn RecommendationEngine>, limit: usize) -> Self {
        Self {
            engine,
            limit: clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT),
            recommendations: Load::Pending,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn recommendations(&self) -> &Load<Vec<Recommendation>> {
        &self.recommendations
    }

    /// Fetches the ranked list.
    ///
    /// A user without a survey record ends in `Failed(SurveyRequired)`, never
    /// in an empty list.
    pub async fn load(&mut self) -> &Load<Vec<Recommendation>> {
        self.recommendations = Load::Pending;
        let result = self.engine.recommend(self.limit).await.map(assign_ranks);
        match &result {
            Ok(list) => tracing::info!(
                engine = self.engine.name(),
                count = list.len(),
                "Recommendations loaded"
            ),
            Err(e) if e.is_survey_required() => {
                tracing::info!(engine = self.engine.name(), "No survey record yet")
            }
            Err(e) => tracing::warn!(engine = self.engine.name(), error = %e, "Failed to load recommendations"),
        }
        self.recommendations = result.into();
        &self.recommendations
    }

    pub async fn popular(&self, limit: usize) -> AppResult<Vec<PopularHobby>> {
        self.engine
            .popular(clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT))
            .await
    }

    pub async fn similar(&self, hobby_id: HobbyId, limit: usize) -> AppResult<Vec<SimilarHobby>> {
        self.engine
            .similar(
                hobby_id,
                clamp_limit(limit, DEFAULT_SIMILAR_LIMIT, MAX_SIMILAR_LIMIT),
            )
            .await
    }
}
