/// REST gateway client
///
/// One shared `reqwest` client with a fixed base URL and request timeout.
/// Every method maps one-to-one onto a backend endpoint: no retries, no
/// caching, no batching. The bearer credential is read from the [`Session`]
/// on each request rather than baked into the client's default headers.
use reqwest::{Client as HttpClient, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use std::sync::Arc;

use crate::{
    api::request_id::{RequestId, REQUEST_ID_HEADER},
    config::Config,
    error::{AppError, AppResult},
    models::{
        CategoryCount, Envelope, ErrorBody, Gathering, GatheringFilters, GatheringId, Hobby,
        HobbyDetail, HobbyFilters, HobbyId, LoginData, LoginRequest, NewGathering, PopularHobby,
        RatingRequest, RatingResult, RegionCount, ScoredHobby, SignupRequest, SimilarHobby,
        SurveyQuestion, SurveyResponse, PROFILE_NOT_FOUND,
    },
    session::Session,
};

pub struct ApiClient {
    http_client: HttpClient,
    base_url: String,
    session: Arc<Session>,
}

#[derive(Deserialize)]
struct HobbyList {
    hobbies: Vec<Hobby>,
}

#[derive(Deserialize)]
struct CategoryList {
    categories: Vec<CategoryCount>,
}

#[derive(Deserialize)]
struct QuestionList {
    questions: Vec<SurveyQuestion>,
}

#[derive(Deserialize)]
struct RecommendationList {
    recommendations: Vec<ScoredHobby>,
}

#[derive(Deserialize)]
struct PopularList {
    popular_hobbies: Vec<PopularHobby>,
}

#[derive(Deserialize)]
struct SimilarList {
    similar_hobbies: Vec<SimilarHobby>,
}

#[derive(Deserialize)]
struct GatheringList {
    gatherings: Vec<Gathering>,
}

#[derive(Deserialize)]
struct RegionList {
    regions: Vec<RegionCount>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<Session>) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends one request and unwraps the success envelope.
    ///
    /// `configure` adds the query string or body. Non-2xx responses become
    /// [`AppError::Server`]/[`AppError::NotFound`]/[`AppError::SurveyRequired`]
    /// using the backend's `{error, message}` body when it parses.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        configure: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> AppResult<Envelope<T>> {
        let request_id = RequestId::new();
        let mut request = self
            .http_client
            .request(method.clone(), self.url(path))
            .header(REQUEST_ID_HEADER, request_id.as_str());

        if let Some(token) = self.session.current_token() {
            request = request.bearer_auth(token);
        }

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %path,
            "Sending request"
        );

        let response = configure(request).send().await.map_err(|e| {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Request failed");
            e
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status,
                "Backend returned error status"
            );
            return Err(classify_error(status, &body, path));
        }

        tracing::info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status,
            "Request completed"
        );

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                response = %body,
                "Failed to deserialize backend response"
            );
            AppError::Internal(format!("Failed to parse response from {}: {}", path, e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute(Method::GET, path, |r| r)
            .await?
            .into_data(path)
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    pub async fn signup(&self, request: &SignupRequest) -> AppResult<()> {
        self.execute::<serde_json::Value>(Method::POST, "/users/signup", |r| r.json(request))
            .await?;
        Ok(())
    }

    pub async fn login(&self, credentials: &LoginRequest) -> AppResult<LoginData> {
        self.execute(Method::POST, "/auth/login", |r| r.json(credentials))
            .await?
            .into_data("/auth/login")
    }

    pub async fn logout(&self) -> AppResult<()> {
        self.execute::<serde_json::Value>(Method::POST, "/auth/logout", |r| r)
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Survey
    // ------------------------------------------------------------------

    pub async fn survey_questions(&self) -> AppResult<Vec<SurveyQuestion>> {
        let list: QuestionList = self.get("/survey/questions").await?;
        Ok(list.questions)
    }

    pub async fn submit_survey(&self, responses: &SurveyResponse) -> AppResult<()> {
        let body = json!({ "responses": responses });
        self.execute::<serde_json::Value>(Method::POST, "/survey/submit", |r| r.json(&body))
            .await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Hobbies
    // ------------------------------------------------------------------

    pub async fn hobbies(&self, filters: &HobbyFilters) -> AppResult<Vec<Hobby>> {
        let query = filters.to_query();
        let list: HobbyList = self
            .execute(Method::GET, "/hobbies", |r| r.query(&query))
            .await?
            .into_data("/hobbies")?;
        Ok(list.hobbies)
    }

    pub async fn hobby_detail(&self, hobby_id: HobbyId) -> AppResult<HobbyDetail> {
        self.get(&format!("/hobbies/{}", hobby_id)).await
    }

    pub async fn rate_hobby(
        &self,
        hobby_id: HobbyId,
        rating: &RatingRequest,
    ) -> AppResult<RatingResult> {
        let path = format!("/hobbies/{}/rate", hobby_id);
        self.execute(Method::POST, &path, |r| r.json(rating))
            .await?
            .into_data(&path)
    }

    pub async fn categories(&self) -> AppResult<Vec<CategoryCount>> {
        let list: CategoryList = self.get("/hobbies/categories").await?;
        Ok(list.categories)
    }

    // ------------------------------------------------------------------
    // Recommendations
    // ------------------------------------------------------------------

    pub async fn recommendations(&self, limit: usize) -> AppResult<Vec<ScoredHobby>> {
        let list: RecommendationList = self
            .execute(Method::GET, "/recommendations", |r| {
                r.query(&[("limit", limit.to_string())])
            })
            .await?
            .into_data("/recommendations")?;
        Ok(list.recommendations)
    }

    pub async fn popular_hobbies(&self, limit: usize) -> AppResult<Vec<PopularHobby>> {
        let list: PopularList = self
            .execute(Method::GET, "/recommendations/popular", |r| {
                r.query(&[("limit", limit.to_string())])
            })
            .await?
            .into_data("/recommendations/popular")?;
        Ok(list.popular_hobbies)
    }

    pub async fn similar_hobbies(
        &self,
        hobby_id: HobbyId,
        limit: usize,
    ) -> AppResult<Vec<SimilarHobby>> {
        let path = format!("/recommendations/similar/{}", hobby_id);
        let list: SimilarList = self
            .execute(Method::GET, &path, |r| r.query(&[("limit", limit.to_string())]))
            .await?
            .into_data(&path)?;
        Ok(list.similar_hobbies)
    }

    // ------------------------------------------------------------------
    // Gatherings
    // ------------------------------------------------------------------

    pub async fn gatherings(&self, filters: &GatheringFilters) -> AppResult<Vec<Gathering>> {
        let query = filters.to_query();
        let list: GatheringList = self
            .execute(Method::GET, "/gatherings", |r| r.query(&query))
            .await?
            .into_data("/gatherings")?;
        Ok(list.gatherings)
    }

    pub async fn gathering_detail(&self, gathering_id: GatheringId) -> AppResult<Gathering> {
        self.get(&format!("/gatherings/{}", gathering_id)).await
    }

    pub async fn create_gathering(&self, gathering: &NewGathering) -> AppResult<Gathering> {
        self.execute(Method::POST, "/gatherings", |r| r.json(gathering))
            .await?
            .into_data("/gatherings")
    }

    pub async fn regions(&self) -> AppResult<Vec<RegionCount>> {
        let list: RegionList = self.get("/gatherings/regions").await?;
        Ok(list.regions)
    }
}

/// Maps a non-2xx response onto the error taxonomy
fn classify_error(status: StatusCode, body: &str, path: &str) -> AppError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    if parsed.error.as_deref() == Some(PROFILE_NOT_FOUND) {
        return AppError::SurveyRequired;
    }

    if status == StatusCode::NOT_FOUND {
        return AppError::NotFound(
            parsed
                .message
                .unwrap_or_else(|| format!("{} was not found", path)),
        );
    }

    AppError::Server {
        status,
        message: parsed.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_profile_not_found() {
        let body = r#"{"error":"Profile Not Found","message":"프로필이 없습니다. 먼저 설문에 응답해주세요."}"#;
        let err = classify_error(StatusCode::BAD_REQUEST, body, "/recommendations");
        assert!(err.is_survey_required());
    }

    #[test]
    fn test_classify_not_found_keeps_message() {
        let body = r#"{"error":"Hobby Not Found","message":"취미를 찾을 수 없습니다."}"#;
        match classify_error(StatusCode::NOT_FOUND, body, "/hobbies/99") {
            AppError::NotFound(msg) => assert_eq!(msg, "취미를 찾을 수 없습니다."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_not_found_without_body() {
        match classify_error(StatusCode::NOT_FOUND, "", "/hobbies/99") {
            AppError::NotFound(msg) => assert!(msg.contains("/hobbies/99")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_business_error() {
        let body = r#"{"error":"Unauthorized","message":"비밀번호가 올바르지 않습니다."}"#;
        match classify_error(StatusCode::UNAUTHORIZED, body, "/auth/login") {
            AppError::Server { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message.as_deref(), Some("비밀번호가 올바르지 않습니다."));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classify_non_json_body() {
        match classify_error(StatusCode::BAD_GATEWAY, "<html>oops</html>", "/hobbies") {
            AppError::Server { message, .. } => assert_eq!(message, None),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
