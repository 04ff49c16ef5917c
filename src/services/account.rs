use regex::Regex;
use std::sync::OnceLock;

use crate::{
    api::ApiClient,
    error::{AppError, AppResult},
    models::SignupRequest,
};

pub const MIN_PASSWORD_LEN: usize = 8;

fn username_regex() -> &'static Regex {
    static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
    USERNAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap())
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
    })
}

/// Signup form as the user filled it in
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: String,
    /// Free text; must be a year when present
    pub birth_year: String,
    pub gender: String,
}

impl SignupForm {
    /// Checks the form and builds the request body.
    ///
    /// The password checks run first, in the order the user sees them.
    pub fn validate(&self) -> AppResult<SignupRequest> {
        if self.password != self.password_confirm {
            return Err(AppError::InvalidInput("Passwords do not match.".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }

        let username = self.username.trim();
        if !username_regex().is_match(username) {
            return Err(AppError::InvalidInput(
                "Username must be 3-30 letters, digits or underscores.".to_string(),
            ));
        }

        let email = self.email.trim();
        if !email_regex().is_match(email) {
            return Err(AppError::InvalidInput("Email address is not valid.".to_string()));
        }

        let birth_year = match self.birth_year.trim() {
            "" => None,
            year => Some(year.parse::<i32>().map_err(|_| {
                AppError::InvalidInput(format!("Birth year must be a number (got {})", year))
            })?),
        };

        let gender = Some(self.gender.trim())
            .filter(|g| !g.is_empty())
            .map(str::to_string);

        Ok(SignupRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
            birth_year,
            gender,
        })
    }
}

/// Validates the form locally, then creates the account.
///
/// Nothing is sent when validation fails.
pub async fn signup(api: &ApiClient, form: &SignupForm) -> AppResult<()> {
    let request = form.validate()?;
    api.signup(&request).await?;
    tracing::info!(username = %request.username, "Account created");
    Ok(())
}
