//! Hobby scoring used by the fixture-backed recommendation engine
//!
//! Mirrors the service's own ranking: a weighted profile match between the
//! survey record and a hobby's attributes, a Bayesian popularity signal, and
//! a pairwise attribute similarity for "similar hobbies".

use crate::{
    error::{AppError, AppResult},
    models::{BudgetTier, Environment, Hobby, QuestionKey, SocialStyle, SurveyResponse},
};

/// Prior number of ratings for the Bayesian average
const PRIOR_COUNT: f64 = 5.0;

/// Prior mean rating for the Bayesian average
const PRIOR_MEAN: f64 = 3.0;

const PROFILE_WEIGHT: f64 = 0.7;
const POPULARITY_WEIGHT: f64 = 0.1;

/// Survey answers reduced to `[0, 1]` preferences
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceProfile {
    pub outdoor: f64,
    pub social: f64,
    pub creative: f64,
    /// Not asked by the survey; stays neutral
    pub learning: f64,
    pub physical: f64,
    pub budget: BudgetTier,
}

impl PreferenceProfile {
    /// Derives the profile from a complete survey record.
    ///
    /// An incomplete record, or one holding an answer that is not among the
    /// question's options, means the survey has to be taken again.
    pub fn from_survey(responses: &SurveyResponse) -> AppResult<Self> {
        if !responses.is_complete() {
            return Err(AppError::SurveyRequired);
        }
        for key in QuestionKey::ALL {
            let value = responses.get(key).unwrap_or_default();
            if !key.accepts(value) {
                tracing::warn!(question = %key, value, "Stored survey answer is not a valid option");
                return Err(AppError::SurveyRequired);
            }
        }

        let answer = |key: QuestionKey| responses.get(key).unwrap_or_default();

        Ok(Self {
            outdoor: match answer(QuestionKey::IndoorOutdoor) {
                "indoor" => 0.0,
                "outdoor" => 1.0,
                _ => 0.5,
            },
            social: match answer(QuestionKey::SocialPreference) {
                "alone" => 0.0,
                "group" => 1.0,
                _ => 0.5,
            },
            creative: match answer(QuestionKey::CreativeInterest) {
                "yes" => 1.0,
                "no" => 0.0,
                _ => 0.5,
            },
            learning: 0.5,
            physical: match answer(QuestionKey::PhysicalActivity) {
                "low" => 0.0,
                "high" => 1.0,
                _ => 0.5,
            },
            budget: answer(QuestionKey::Budget).parse()?,
        })
    }
}

/// Maps a 1..=5 attribute level onto `[0, 1]`
fn normalize_level(level: u8) -> f64 {
    (f64::from(level.clamp(1, 5)) - 1.0) / 4.0
}

fn budget_fit(user: BudgetTier, hobby: BudgetTier) -> f64 {
    use BudgetTier::*;
    match (user, hobby) {
        (u, h) if u == h => 1.0,
        (High, Medium) | (Medium, Low) => 0.7,
        (Low, Medium) => 0.3,
        _ => 0.1,
    }
}

/// Weighted match between a profile and a hobby, in `[0, 1]`
pub fn profile_match(profile: &PreferenceProfile, hobby: &Hobby) -> f64 {
    let mut score = 0.0;

    score += match hobby.indoor_outdoor {
        Environment::Outdoor => profile.outdoor * 0.2,
        Environment::Indoor => (1.0 - profile.outdoor) * 0.2,
        Environment::Both => 0.15,
    };

    score += match hobby.social_individual {
        SocialStyle::Social => profile.social * 0.2,
        SocialStyle::Individual => (1.0 - profile.social) * 0.2,
        SocialStyle::Both => 0.15,
    };

    score += (1.0 - (profile.creative - normalize_level(hobby.creativity_level)).abs()) * 0.15;
    score += (1.0 - (profile.learning - normalize_level(hobby.difficulty_level)).abs()) * 0.1;
    score += (1.0 - (profile.physical - normalize_level(hobby.physical_intensity)).abs()) * 0.2;
    score += budget_fit(profile.budget, hobby.required_budget) * 0.15;

    // weights sum to 1.0
    round4(score)
}

/// Bayesian-averaged rating on the 1..5 scale; `PRIOR_MEAN` when unrated
pub fn bayesian_average(average_rating: f64, rating_count: u32) -> f64 {
    if rating_count == 0 {
        return PRIOR_MEAN;
    }
    let count = f64::from(rating_count);
    count / (count + PRIOR_COUNT) * average_rating + PRIOR_COUNT / (count + PRIOR_COUNT) * PRIOR_MEAN
}

/// Popularity signal in `[0, 1]`; unrated hobbies contribute nothing
pub fn popularity(hobby: &Hobby) -> f64 {
    let stats = hobby.rating();
    if stats.rating_count == 0 {
        return 0.0;
    }
    round4(bayesian_average(stats.average_rating, stats.rating_count) / 5.0)
}

/// Final recommendation score from the locally available signals.
///
/// There is no collaborative-filtering signal offline, so the remaining
/// weights are rescaled to sum to one.
pub fn recommendation_score(profile_match: f64, popularity: f64) -> f64 {
    round4(
        (profile_match * PROFILE_WEIGHT + popularity * POPULARITY_WEIGHT)
            / (PROFILE_WEIGHT + POPULARITY_WEIGHT),
    )
}

/// Attribute similarity between two hobbies, in `[0, 1]`
pub fn similarity(a: &Hobby, b: &Hobby) -> f64 {
    let mut score = 0.0;

    if a.category == b.category {
        score += 0.3;
    }

    score += if a.indoor_outdoor == b.indoor_outdoor {
        0.15
    } else if a.indoor_outdoor == Environment::Both || b.indoor_outdoor == Environment::Both {
        0.1
    } else {
        0.0
    };

    score += if a.social_individual == b.social_individual {
        0.15
    } else if a.social_individual == SocialStyle::Both || b.social_individual == SocialStyle::Both
    {
        0.1
    } else {
        0.0
    };

    let budget_diff = f64::from(a.required_budget.level().abs_diff(b.required_budget.level()));
    score += (2.0 - budget_diff) / 2.0 * 0.1;

    for (x, y) in [
        (a.difficulty_level, b.difficulty_level),
        (a.physical_intensity, b.physical_intensity),
        (a.creativity_level, b.creativity_level),
    ] {
        let diff = f64::from(x.clamp(1, 5).abs_diff(y.clamp(1, 5)));
        score += (4.0 - diff) / 4.0 * 0.1;
    }

    round4(score)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
