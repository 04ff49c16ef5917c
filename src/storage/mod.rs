//! Durable client-side key/value storage
//!
//! Holds the session credential, the signed-in profile and the pending survey
//! record across process runs, the way a browser keeps them in local storage.
//! Values are plain strings; JSON records go through `get_json`/`set_json`.

use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;

use crate::error::{AppError, AppResult};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Fixed keys under which client state is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Bearer token, stored as the raw string
    Token,
    /// JSON-serialized [`User`](crate::models::User)
    User,
    /// Flat JSON [`SurveyResponse`](crate::models::SurveyResponse)
    SurveyResponses,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Token => "token",
            StorageKey::User => "user",
            StorageKey::SurveyResponses => "survey_responses",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous string store; every write is durable once the call returns
pub trait LocalStore: Send + Sync {
    fn get(&self, key: StorageKey) -> AppResult<Option<String>>;

    fn set(&self, key: StorageKey, value: &str) -> AppResult<()>;

    /// Removing an absent key is not an error
    fn remove(&self, key: StorageKey) -> AppResult<()>;
}

impl dyn LocalStore {
    /// Reads and deserializes a JSON record
    pub fn get_json<T: DeserializeOwned>(&self, key: StorageKey) -> AppResult<Option<T>> {
        match self.get(key)? {
            Some(json) => {
                let value = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Stored {} record is unreadable: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: StorageKey, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_storage_key_display() {
        assert_eq!(format!("{}", StorageKey::Token), "token");
        assert_eq!(format!("{}", StorageKey::User), "user");
        assert_eq!(format!("{}", StorageKey::SurveyResponses), "survey_responses");
    }

    #[test]
    fn test_json_round_trip_through_dyn_store() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
        store
            .set_json(StorageKey::SurveyResponses, &vec!["indoor", "alone"])
            .unwrap();

        let restored: Option<Vec<String>> = store.get_json(StorageKey::SurveyResponses).unwrap();
        assert_eq!(restored, Some(vec!["indoor".to_string(), "alone".to_string()]));
    }

    #[test]
    fn test_get_json_reports_corrupt_record() {
        let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
        store.set(StorageKey::User, "{not json").unwrap();

        let result: AppResult<Option<serde_json::Value>> = store.get_json(StorageKey::User);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
