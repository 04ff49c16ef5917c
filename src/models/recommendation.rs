use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::Hobby;

/// How well a hobby fits a survey record, as a percentage in `[0, 100]`
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchScore(f64);

impl MatchScore {
    /// Builds a score from a percentage, clamping into range (NaN becomes 0)
    pub fn from_percent(percent: f64) -> Self {
        if percent.is_nan() {
            return Self(0.0);
        }
        Self(percent.clamp(0.0, 100.0))
    }

    /// Builds a score from a `[0, 1]` ratio, rounded to one decimal place
    pub fn from_ratio(ratio: f64) -> Self {
        Self::from_percent((ratio * 1000.0).round() / 10.0)
    }

    pub fn percent(&self) -> f64 {
        self.0
    }
}

impl Display for MatchScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}%", self.0)
        } else {
            write!(f, "{:.1}%", self.0)
        }
    }
}

/// Per-signal contributions to a recommendation score, each in `[0, 1]`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub profile_match: f64,
    #[serde(default)]
    pub collaborative_filtering: f64,
    #[serde(default)]
    pub popularity: f64,
}

/// One entry of `GET /recommendations`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredHobby {
    pub hobby: Hobby,
    pub recommendation_score: f64,
    pub match_percentage: f64,
    #[serde(default)]
    pub score_breakdown: Option<ScoreBreakdown>,
}

/// One entry of `GET /recommendations/popular`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularHobby {
    pub hobby: Hobby,
    pub avg_rating: f64,
    pub rating_count: u32,
    /// Bayesian-averaged rating on the 1..5 scale
    pub popularity_score: f64,
}

/// One entry of `GET /recommendations/similar/:id`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarHobby {
    pub hobby: Hobby,
    pub similarity_score: f64,
    pub similarity_percentage: f64,
}

/// A hobby as displayed in the recommendation view
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    /// 1-based display position
    pub rank: usize,
    pub hobby: Hobby,
    pub match_score: MatchScore,
}
