use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{null_as_default, null_as_true, HobbyId, HobbySummary};

pub type GatheringId = i64;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Online,
    #[default]
    Offline,
    Hybrid,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Online => "online",
            MeetingType::Offline => "offline",
            MeetingType::Hybrid => "hybrid",
        }
    }
}

impl Display for MeetingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MeetingType {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(MeetingType::Online),
            "offline" => Ok(MeetingType::Offline),
            "hybrid" => Ok(MeetingType::Hybrid),
            other => Err(crate::error::AppError::InvalidInput(format!(
                "meeting_type must be one of online, offline, hybrid (got {})",
                other
            ))),
        }
    }
}

/// A club or meetup around a hobby
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gathering {
    pub gathering_id: GatheringId,
    pub hobby_id: HobbyId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meeting_type: MeetingType,
    #[serde(default)]
    pub schedule_info: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_count: u32,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default = "default_active", deserialize_with = "null_as_true")]
    pub is_active: bool,
    /// ISO-8601 without offset, as the backend emits it
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub hobby: Option<HobbySummary>,
}

fn default_active() -> bool {
    true
}

/// Filters for `GET /gatherings`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatheringFilters {
    pub hobby_id: Option<HobbyId>,
    pub region: Option<String>,
    pub meeting_type: Option<MeetingType>,
    pub search: Option<String>,
}

impl GatheringFilters {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(hobby_id) = self.hobby_id {
            query.push(("hobby_id", hobby_id.to_string()));
        }
        if let Some(region) = self.region.as_deref().filter(|r| !r.trim().is_empty()) {
            query.push(("region", region.trim().to_string()));
        }
        if let Some(meeting_type) = self.meeting_type {
            query.push(("meeting_type", meeting_type.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_string()));
        }
        query
    }
}

/// Body of `POST /gatherings`
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct NewGathering {
    pub hobby_id: Option<HobbyId>,
    pub name: String,
    pub region: String,
    pub meeting_type: MeetingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

/// Region with its number of active gatherings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegionCount {
    pub region: String,
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_gathering_deserialization() {
        let gathering: Gathering = serde_json::from_value(json!({
            "gathering_id": 4,
            "hobby_id": 1,
            "name": "아침 요가 모임",
            "region": "서울",
            "meeting_type": "hybrid",
            "member_count": 12,
            "is_active": true,
            "created_at": "2024-05-01T09:30:00",
            "hobby": { "hobby_id": 1, "name": "요가", "category": "운동" }
        }))
        .unwrap();
        assert_eq!(gathering.meeting_type, MeetingType::Hybrid);
        assert_eq!(gathering.member_count, 12);
        assert!(gathering.created_at.is_some());
        assert_eq!(gathering.hobby.unwrap().category, "운동");
    }

    #[test]
    fn test_gathering_defaults() {
        let gathering: Gathering = serde_json::from_value(json!({
            "gathering_id": 5,
            "hobby_id": 2,
            "name": "수채화 동호회"
        }))
        .unwrap();
        assert_eq!(gathering.meeting_type, MeetingType::Offline);
        assert!(gathering.is_active);
        assert!(gathering.hobby.is_none());
    }

    #[test]
    fn test_gathering_null_columns() {
        let gathering: Gathering = serde_json::from_value(json!({
            "gathering_id": 6,
            "hobby_id": 3,
            "name": "주말 등산 모임",
            "description": null,
            "location": null,
            "region": null,
            "meeting_type": null,
            "schedule_info": null,
            "member_count": null,
            "contact_info": null,
            "website_url": null,
            "is_active": null,
            "created_at": null,
            "hobby": null
        }))
        .unwrap();
        assert_eq!(gathering.meeting_type, MeetingType::Offline);
        assert_eq!(gathering.member_count, 0);
        assert!(gathering.is_active);
        assert!(gathering.region.is_none());
    }

    #[test]
    fn test_filters_to_query() {
        let filters = GatheringFilters {
            hobby_id: Some(3),
            region: Some(" 부산 ".to_string()),
            meeting_type: Some(MeetingType::Online),
            search: Some(String::new()),
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("hobby_id", "3".to_string()),
                ("region", "부산".to_string()),
                ("meeting_type", "online".to_string()),
            ]
        );
    }

    #[test]
    fn test_meeting_type_parse() {
        assert_eq!("Hybrid".parse::<MeetingType>().unwrap(), MeetingType::Hybrid);
        assert!("carpool".parse::<MeetingType>().is_err());
    }
}
