use serde::{Deserialize, Deserializer};

pub mod gathering;
pub mod hobby;
pub mod recommendation;
pub mod survey;
pub mod user;

pub use gathering::{Gathering, GatheringFilters, GatheringId, MeetingType, NewGathering, RegionCount};
pub use hobby::{
    BudgetTier, CategoryCount, Environment, Hobby, HobbyDetail, HobbyFilters, HobbyId,
    HobbySummary, RatingRequest, RatingResult, RatingStats, Review, SocialStyle,
};
pub use recommendation::{
    MatchScore, PopularHobby, Recommendation, ScoreBreakdown, ScoredHobby, SimilarHobby,
};
pub use survey::{QuestionKey, SurveyOption, SurveyQuestion, SurveyResponse};
pub use user::{LoginData, LoginRequest, SignupRequest, User};

// ============================================================================
// Nullable columns
// ============================================================================

/// Reads `null` as `T::default()`.
///
/// The backend emits every column, including nullable ones, so
/// `#[serde(default)]` alone does not cover a `null` value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Attribute levels default to 1 when absent or `null`
pub(crate) fn null_as_level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u8>::deserialize(deserializer)?.unwrap_or(hobby::DEFAULT_LEVEL))
}

/// `is_active` defaults to true when absent or `null`
pub(crate) fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

// ============================================================================
// Response envelopes
// ============================================================================

/// Success envelope wrapping every backend response
///
/// The backend answers `{"status": "success", "message": "...", "data": {...}}`.
/// `data` is absent on acknowledgement-only endpoints such as logout.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwraps the payload, treating a missing `data` field as a malformed response
    pub fn into_data(self, endpoint: &str) -> crate::error::AppResult<T> {
        self.data.ok_or_else(|| {
            crate::error::AppError::Internal(format!("Response from {} carried no data", endpoint))
        })
    }
}

/// Error body returned with non-2xx responses: `{"error": "...", "message": "..."}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `error` tag the backend uses when a user has no survey-derived profile yet
pub const PROFILE_NOT_FOUND: &str = "Profile Not Found";
