use reqwest::StatusCode;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Survey required: answer the survey before requesting recommendations")]
    SurveyRequired,

    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Shown when recommendations are requested before any survey record exists
pub const SURVEY_REQUIRED_MESSAGE: &str = "Please answer the survey first.";

impl AppError {
    /// Converts the error into the inline message shown to the user.
    ///
    /// Server-reported messages are passed through verbatim. Validation and
    /// not-found errors carry their own text. Everything else (transport
    /// failures, storage problems, servers that sent no message) falls back
    /// to the caller's generic text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            AppError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            AppError::InvalidInput(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::SurveyRequired => SURVEY_REQUIRED_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_survey_required(&self) -> bool {
        matches!(self, AppError::SurveyRequired)
    }
}

pub type AppResult<T> = Result<T, AppError>;
