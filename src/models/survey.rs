use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeMap, fmt::Display};

/// The fixed survey questions, in the order they are asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKey {
    IndoorOutdoor,
    SocialPreference,
    PhysicalActivity,
    CreativeInterest,
    Budget,
}

/// One selectable answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurveyOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn option(value: &'static str, label: &'static str) -> SurveyOption {
    SurveyOption { value, label }
}

const INDOOR_OUTDOOR_OPTIONS: &[SurveyOption] = &[
    option("indoor", "실내 활동"),
    option("outdoor", "야외 활동"),
    option("both", "둘 다 좋아요"),
];

const SOCIAL_OPTIONS: &[SurveyOption] = &[
    option("alone", "혼자 하는 것"),
    option("group", "여럿이 함께"),
    option("both", "상관없어요"),
];

const PHYSICAL_OPTIONS: &[SurveyOption] = &[
    option("low", "가벼운 활동"),
    option("moderate", "적당한 활동"),
    option("high", "활발한 활동"),
];

const CREATIVE_OPTIONS: &[SurveyOption] = &[
    option("yes", "네, 관심 있어요"),
    option("no", "아니요"),
    option("maybe", "잘 모르겠어요"),
];

const BUDGET_OPTIONS: &[SurveyOption] = &[
    option("low", "월 3만원 이하"),
    option("medium", "월 3만원~10만원"),
    option("high", "월 10만원 이상"),
];

impl QuestionKey {
    pub const ALL: [QuestionKey; 5] = [
        QuestionKey::IndoorOutdoor,
        QuestionKey::SocialPreference,
        QuestionKey::PhysicalActivity,
        QuestionKey::CreativeInterest,
        QuestionKey::Budget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKey::IndoorOutdoor => "indoor_outdoor",
            QuestionKey::SocialPreference => "social_preference",
            QuestionKey::PhysicalActivity => "physical_activity",
            QuestionKey::CreativeInterest => "creative_interest",
            QuestionKey::Budget => "budget",
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            QuestionKey::IndoorOutdoor => "실내 활동과 야외 활동 중 어느 쪽을 더 좋아하시나요?",
            QuestionKey::SocialPreference => "혼자 하는 활동과 여럿이 함께하는 활동 중 어느 쪽이 편하신가요?",
            QuestionKey::PhysicalActivity => "어느 정도의 신체 활동을 원하시나요?",
            QuestionKey::CreativeInterest => "그림, 음악, 공예 같은 창작 활동에 관심이 있으신가요?",
            QuestionKey::Budget => "취미에 한 달에 얼마 정도 쓰실 수 있나요?",
        }
    }

    pub fn options(&self) -> &'static [SurveyOption] {
        match self {
            QuestionKey::IndoorOutdoor => INDOOR_OUTDOOR_OPTIONS,
            QuestionKey::SocialPreference => SOCIAL_OPTIONS,
            QuestionKey::PhysicalActivity => PHYSICAL_OPTIONS,
            QuestionKey::CreativeInterest => CREATIVE_OPTIONS,
            QuestionKey::Budget => BUDGET_OPTIONS,
        }
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.options().iter().any(|o| o.value == value)
    }
}

impl Display for QuestionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuestionKey {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| {
                crate::error::AppError::InvalidInput(format!("Unknown survey question: {}", s))
            })
    }
}

/// Answers keyed by question; serializes to a flat JSON object in question order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SurveyResponse {
    answers: BTreeMap<QuestionKey, String>,
}

/// Keys outside the fixed questions and non-string values are skipped, so a
/// record written by an older survey still reads back.
impl<'de> Deserialize<'de> for SurveyResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let answers = raw
            .into_iter()
            .filter_map(|(key, value)| {
                let key = key.parse::<QuestionKey>().ok()?;
                let value = value.as_str()?.to_string();
                Some((key, value))
            })
            .collect();
        Ok(Self { answers })
    }
}

impl SurveyResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: QuestionKey) -> Option<&str> {
        self.answers.get(&key).map(String::as_str)
    }

    /// Records or overwrites one answer
    pub(crate) fn insert(&mut self, key: QuestionKey, value: impl Into<String>) {
        self.answers.insert(key, value.into());
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// True iff every fixed question has an answer
    pub fn is_complete(&self) -> bool {
        QuestionKey::ALL.iter().all(|key| self.answers.contains_key(key))
    }

    pub fn missing(&self) -> Vec<QuestionKey> {
        QuestionKey::ALL
            .into_iter()
            .filter(|key| !self.answers.contains_key(key))
            .collect()
    }
}

/// A question as served by `GET /survey/questions`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyQuestion {
    pub question_id: i64,
    pub question_text: String,
    pub question_type: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub options: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_question_has_options() {
        for key in QuestionKey::ALL {
            assert!(!key.options().is_empty(), "{} has no options", key);
        }
    }

    #[test]
    fn test_accepts_only_listed_options() {
        assert!(QuestionKey::SocialPreference.accepts("alone"));
        assert!(!QuestionKey::SocialPreference.accepts("indoor"));
        assert!(QuestionKey::Budget.accepts("medium"));
    }

    #[test]
    fn test_parse_question_key() {
        assert_eq!(
            "creative_interest".parse::<QuestionKey>().unwrap(),
            QuestionKey::CreativeInterest
        );
        assert!("favourite_colour".parse::<QuestionKey>().is_err());
    }

    #[test]
    fn test_response_serializes_flat_in_question_order() {
        let mut response = SurveyResponse::new();
        response.insert(QuestionKey::Budget, "medium");
        response.insert(QuestionKey::IndoorOutdoor, "indoor");

        let text = serde_json::to_string(&response).unwrap();
        assert_eq!(text, r#"{"indoor_outdoor":"indoor","budget":"medium"}"#);
    }

    #[test]
    fn test_response_completeness() {
        let mut response = SurveyResponse::new();
        assert!(!response.is_complete());
        assert_eq!(response.missing().len(), 5);

        for key in QuestionKey::ALL {
            response.insert(key, key.options()[0].value);
        }
        assert!(response.is_complete());
        assert!(response.missing().is_empty());
    }

    #[test]
    fn test_response_deserializes_from_flat_record() {
        let response: SurveyResponse = serde_json::from_value(json!({
            "indoor_outdoor": "indoor",
            "social_preference": "alone"
        }))
        .unwrap();
        assert_eq!(response.get(QuestionKey::SocialPreference), Some("alone"));
        assert_eq!(response.get(QuestionKey::Budget), None);
    }

    #[test]
    fn test_response_skips_unknown_keys() {
        let response: SurveyResponse = serde_json::from_value(json!({
            "indoor_outdoor": "outdoor",
            "learning": "yes",
            "budget": 3
        }))
        .unwrap();
        assert_eq!(response.len(), 1);
        assert_eq!(response.get(QuestionKey::IndoorOutdoor), Some("outdoor"));
    }
}
