use crate::error::{AppError, AppResult};

/// Load state of data a view fetches when it is opened
#[derive(Debug)]
pub enum Load<T> {
    Pending,
    Ready(T),
    Failed(AppError),
}

impl<T> Default for Load<T> {
    fn default() -> Self {
        Load::Pending
    }
}

impl<T> Load<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Load::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Load::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            Load::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Inline message for a failed load, if any
    pub fn error_message(&self, fallback: &str) -> Option<String> {
        self.error().map(|e| e.user_message(fallback))
    }

    pub fn into_result(self) -> AppResult<Option<T>> {
        match self {
            Load::Pending => Ok(None),
            Load::Ready(value) => Ok(Some(value)),
            Load::Failed(err) => Err(err),
        }
    }
}

impl<T> From<AppResult<T>> for Load<T> {
    fn from(result: AppResult<T>) -> Self {
        match result {
            Ok(value) => Load::Ready(value),
            Err(err) => Load::Failed(err),
        }
    }
}
