use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{null_as_default, null_as_level};

/// Catalog identifier of a hobby
pub type HobbyId = i64;

/// Where a hobby is practised
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Indoor,
    Outdoor,
    #[default]
    Both,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Indoor => "indoor",
            Environment::Outdoor => "outdoor",
            Environment::Both => "both",
        }
    }
}

/// Whether a hobby is done with others or alone
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SocialStyle {
    Social,
    Individual,
    #[default]
    Both,
}

impl SocialStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialStyle::Social => "social",
            SocialStyle::Individual => "individual",
            SocialStyle::Both => "both",
        }
    }
}

/// Monthly cost bracket
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    #[default]
    Medium,
    High,
}

impl BudgetTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Low => "low",
            BudgetTier::Medium => "medium",
            BudgetTier::High => "high",
        }
    }

    /// 1 for low through 3 for high
    pub fn level(&self) -> u8 {
        match self {
            BudgetTier::Low => 1,
            BudgetTier::Medium => 2,
            BudgetTier::High => 3,
        }
    }
}

macro_rules! impl_display_and_parse {
    ($ty:ty, $($text:literal => $variant:expr),+ $(,)?) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = crate::error::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    other => Err(crate::error::AppError::InvalidInput(format!(
                        "Unknown {} value: {}",
                        stringify!($ty),
                        other
                    ))),
                }
            }
        }
    };
}

impl_display_and_parse!(Environment, "indoor" => Environment::Indoor, "outdoor" => Environment::Outdoor, "both" => Environment::Both);
impl_display_and_parse!(SocialStyle, "social" => SocialStyle::Social, "individual" => SocialStyle::Individual, "both" => SocialStyle::Both);
impl_display_and_parse!(BudgetTier, "low" => BudgetTier::Low, "medium" => BudgetTier::Medium, "high" => BudgetTier::High);

/// Level assumed for a missing difficulty, intensity or creativity value
pub const DEFAULT_LEVEL: u8 = 1;

fn default_level() -> u8 {
    DEFAULT_LEVEL
}

/// A hobby entry from the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hobby {
    pub hobby_id: HobbyId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub indoor_outdoor: Environment,
    #[serde(default, deserialize_with = "null_as_default")]
    pub social_individual: SocialStyle,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_budget: BudgetTier,
    /// 1 (easy) to 5 (hard)
    #[serde(default = "default_level", deserialize_with = "null_as_level")]
    pub difficulty_level: u8,
    /// 1 (sedentary) to 5 (strenuous)
    #[serde(default = "default_level", deserialize_with = "null_as_level")]
    pub physical_intensity: u8,
    /// 1 (routine) to 5 (highly creative)
    #[serde(default = "default_level", deserialize_with = "null_as_level")]
    pub creativity_level: u8,
    #[serde(default)]
    pub time_commitment: Option<String>,
    #[serde(default)]
    pub tutorial_video_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<u32>,
}

impl Hobby {
    pub fn rating(&self) -> RatingStats {
        RatingStats {
            average_rating: self.average_rating.unwrap_or(0.0),
            rating_count: self.rating_count.unwrap_or(0),
        }
    }
}

/// Aggregate rating of a hobby
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RatingStats {
    pub average_rating: f64,
    pub rating_count: u32,
}

/// A review attached to a hobby detail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub rating: u8,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experienced: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `GET /hobbies/:id` payload: the hobby plus its most recent reviews
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HobbyDetail {
    #[serde(flatten)]
    pub hobby: Hobby,
    #[serde(default)]
    pub recent_reviews: Vec<Review>,
}

/// Short hobby reference embedded in gatherings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HobbySummary {
    pub hobby_id: HobbyId,
    pub name: String,
    pub category: String,
}

/// Category with the number of hobbies in it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub count: u32,
}

/// Catalog filters, sent verbatim as query parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HobbyFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub indoor_outdoor: Option<Environment>,
    pub social_individual: Option<SocialStyle>,
    pub budget: Option<BudgetTier>,
}

impl HobbyFilters {
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// Query pairs for `GET /hobbies`, skipping unset and blank fields
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = non_blank(&self.search) {
            query.push(("search", search.to_string()));
        }
        if let Some(category) = non_blank(&self.category) {
            query.push(("category", category.to_string()));
        }
        if let Some(environment) = self.indoor_outdoor {
            query.push(("indoor_outdoor", environment.to_string()));
        }
        if let Some(social) = self.social_individual {
            query.push(("social_individual", social.to_string()));
        }
        if let Some(budget) = self.budget {
            query.push(("budget", budget.to_string()));
        }
        query
    }

    /// Matches the backend's filtering rules.
    ///
    /// Category and budget are exact. Environment and social style also
    /// accept hobbies tagged `both`. Search is a case-insensitive substring
    /// of name or description.
    pub fn matches(&self, hobby: &Hobby) -> bool {
        if let Some(category) = non_blank(&self.category) {
            if hobby.category != category {
                return false;
            }
        }
        if let Some(search) = non_blank(&self.search) {
            let needle = search.to_lowercase();
            let in_name = hobby.name.to_lowercase().contains(&needle);
            let in_description = hobby
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !in_name && !in_description {
                return false;
            }
        }
        if let Some(environment) = self.indoor_outdoor {
            if hobby.indoor_outdoor != environment && hobby.indoor_outdoor != Environment::Both {
                return false;
            }
        }
        if let Some(social) = self.social_individual {
            if hobby.social_individual != social && hobby.social_individual != SocialStyle::Both {
                return false;
            }
        }
        if let Some(budget) = self.budget {
            if hobby.required_budget != budget {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Body of `POST /hobbies/:id/rate`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingRequest {
    /// 1 to 5 stars
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_text: Option<String>,
    pub experienced: bool,
}

impl RatingRequest {
    pub fn validate(&self) -> crate::error::AppResult<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(crate::error::AppError::InvalidInput(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }
}

/// `data` payload of a successful rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingResult {
    pub hobby_id: HobbyId,
    #[serde(default)]
    pub hobby_name: Option<String>,
    pub rating: u8,
    #[serde(default)]
    pub review_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experienced: bool,
    pub updated_stats: RatingStats,
}
