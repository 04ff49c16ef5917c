/// Fixture-backed providers
///
/// Serves the bundled hobby catalog (`fixtures/hobbies.json`) without a
/// backend. The survey record is persisted in the local store under
/// `survey_responses` and recommendations are scored against it locally.
/// Ratings submitted here live for the lifetime of the process only.
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        CategoryCount, Hobby, HobbyDetail, HobbyFilters, HobbyId, PopularHobby, RatingRequest,
        RatingResult, Review, ScoreBreakdown, ScoredHobby, SimilarHobby, SurveyResponse,
    },
    services::{
        providers::{HobbyCatalog, RecommendationEngine, SurveyStore},
        scoring::{self, PreferenceProfile},
    },
    storage::{LocalStore, StorageKey},
};

const PROVIDER_NAME: &str = "fixture";

const BUNDLED_CATALOG: &str = include_str!("../../../fixtures/hobbies.json");

pub struct FixtureBackend {
    hobbies: RwLock<Vec<Hobby>>,
    /// The current user's own review per hobby
    own_reviews: Mutex<HashMap<HobbyId, Review>>,
    store: Arc<dyn LocalStore>,
}

impl FixtureBackend {
    /// Loads the catalog shipped with the crate
    pub fn bundled(store: Arc<dyn LocalStore>) -> AppResult<Self> {
        let hobbies: Vec<Hobby> = serde_json::from_str(BUNDLED_CATALOG)?;
        tracing::debug!(count = hobbies.len(), "Loaded bundled hobby catalog");
        Ok(Self::with_hobbies(hobbies, store))
    }

    pub fn with_hobbies(hobbies: Vec<Hobby>, store: Arc<dyn LocalStore>) -> Self {
        Self {
            hobbies: RwLock::new(hobbies),
            own_reviews: Mutex::new(HashMap::new()),
            store,
        }
    }

    fn hobbies(&self) -> std::sync::RwLockReadGuard<'_, Vec<Hobby>> {
        self.hobbies.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn reviews(&self) -> std::sync::MutexGuard<'_, HashMap<HobbyId, Review>> {
        self.own_reviews.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn find(&self, hobby_id: HobbyId) -> AppResult<Hobby> {
        self.hobbies()
            .iter()
            .find(|h| h.hobby_id == hobby_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Hobby {} not found", hobby_id)))
    }

    /// An unreadable record counts as no survey at all
    fn stored_survey(&self) -> AppResult<SurveyResponse> {
        match self.store.get_json::<SurveyResponse>(StorageKey::SurveyResponses) {
            Ok(Some(responses)) => Ok(responses),
            Ok(None) => Err(AppError::SurveyRequired),
            Err(AppError::Internal(message)) => {
                tracing::warn!(%message, "Ignoring stored survey record");
                Err(AppError::SurveyRequired)
            }
            Err(e) => Err(e),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sorts by descending score, keeping catalog order among ties
fn rank_by<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

#[async_trait]
impl HobbyCatalog for FixtureBackend {
    async fn list_hobbies(&self, filters: &HobbyFilters) -> AppResult<Vec<Hobby>> {
        let hobbies: Vec<Hobby> = self
            .hobbies()
            .iter()
            .filter(|h| filters.matches(h))
            .cloned()
            .collect();
        tracing::debug!(count = hobbies.len(), ?filters, "Filtered fixture hobbies");
        Ok(hobbies)
    }

    async fn hobby_detail(&self, hobby_id: HobbyId) -> AppResult<HobbyDetail> {
        let hobby = self.find(hobby_id)?;
        let recent_reviews = self.reviews().get(&hobby_id).cloned().into_iter().collect();
        Ok(HobbyDetail {
            hobby,
            recent_reviews,
        })
    }

    async fn categories(&self) -> AppResult<Vec<CategoryCount>> {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for hobby in self.hobbies().iter() {
            *counts.entry(hobby.category.clone()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }

    async fn rate_hobby(
        &self,
        hobby_id: HobbyId,
        rating: &RatingRequest,
    ) -> AppResult<RatingResult> {
        rating.validate()?;

        let mut hobbies = self.hobbies.write().unwrap_or_else(PoisonError::into_inner);
        let hobby = hobbies
            .iter_mut()
            .find(|h| h.hobby_id == hobby_id)
            .ok_or_else(|| AppError::NotFound(format!("Hobby {} not found", hobby_id)))?;

        let review = Review {
            rating: rating.rating,
            review_text: rating.review_text.clone(),
            experienced: rating.experienced,
            created_at: Some(Utc::now().to_rfc3339()),
        };
        let previous = self.reviews().insert(hobby_id, review);

        let stats = hobby.rating();
        let mut total = stats.average_rating * f64::from(stats.rating_count);
        let mut count = stats.rating_count;
        match previous {
            Some(old) => total += f64::from(rating.rating) - f64::from(old.rating),
            None => {
                total += f64::from(rating.rating);
                count += 1;
            }
        }
        hobby.average_rating = Some(round2(total / f64::from(count)));
        hobby.rating_count = Some(count);

        tracing::info!(hobby_id, rating = rating.rating, "Rated fixture hobby");

        Ok(RatingResult {
            hobby_id,
            hobby_name: Some(hobby.name.clone()),
            rating: rating.rating,
            review_text: rating.review_text.clone(),
            experienced: rating.experienced,
            updated_stats: hobby.rating(),
        })
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[async_trait]
impl RecommendationEngine for FixtureBackend {
    async fn recommend(&self, limit: usize) -> AppResult<Vec<ScoredHobby>> {
        let profile = PreferenceProfile::from_survey(&self.stored_survey()?)?;
        let rated: Vec<HobbyId> = self.reviews().keys().copied().collect();

        let mut scored: Vec<ScoredHobby> = self
            .hobbies()
            .iter()
            .filter(|h| !rated.contains(&h.hobby_id))
            .map(|hobby| {
                let profile_match = scoring::profile_match(&profile, hobby);
                let popularity = scoring::popularity(hobby);
                let score = scoring::recommendation_score(profile_match, popularity);
                ScoredHobby {
                    hobby: hobby.clone(),
                    recommendation_score: score,
                    match_percentage: (score * 1000.0).round() / 10.0,
                    score_breakdown: Some(ScoreBreakdown {
                        profile_match,
                        collaborative_filtering: 0.0,
                        popularity,
                    }),
                }
            })
            .collect();

        rank_by(&mut scored, |s| s.recommendation_score);
        scored.truncate(limit);
        Ok(scored)
    }

    async fn popular(&self, limit: usize) -> AppResult<Vec<PopularHobby>> {
        let mut popular: Vec<PopularHobby> = self
            .hobbies()
            .iter()
            .map(|hobby| {
                let stats = hobby.rating();
                PopularHobby {
                    hobby: hobby.clone(),
                    avg_rating: round2(stats.average_rating),
                    rating_count: stats.rating_count,
                    popularity_score: round2(scoring::bayesian_average(
                        stats.average_rating,
                        stats.rating_count,
                    )),
                }
            })
            .collect();

        rank_by(&mut popular, |p| p.popularity_score);
        popular.truncate(limit);
        Ok(popular)
    }

    async fn similar(&self, hobby_id: HobbyId, limit: usize) -> AppResult<Vec<SimilarHobby>> {
        let base = self.find(hobby_id)?;

        let mut similar: Vec<SimilarHobby> = self
            .hobbies()
            .iter()
            .filter(|h| h.hobby_id != hobby_id)
            .map(|hobby| {
                let score = scoring::similarity(&base, hobby);
                SimilarHobby {
                    hobby: hobby.clone(),
                    similarity_score: score,
                    similarity_percentage: (score * 1000.0).round() / 10.0,
                }
            })
            .collect();

        rank_by(&mut similar, |s| s.similarity_score);
        similar.truncate(limit);
        Ok(similar)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[async_trait]
impl SurveyStore for FixtureBackend {
    async fn submit(&self, responses: &SurveyResponse) -> AppResult<()> {
        if !responses.is_complete() {
            return Err(AppError::InvalidInput(
                "All survey questions must be answered".to_string(),
            ));
        }
        self.store.set_json(StorageKey::SurveyResponses, responses)?;
        tracing::info!(answers = responses.len(), "Survey stored locally");
        Ok(())
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
