use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use hobby_client::{
    api::{AppState, REQUEST_ID_HEADER},
    config::Config,
    models::{HobbyFilters, LoginRequest, QuestionKey},
    services::{CatalogBrowser, RecommendationView, SurveyFlow},
    storage::{LocalStore, MemoryStore, StorageKey},
};

const BAD_LOGIN_MESSAGE: &str = "이메일/사용자명 또는 비밀번호가 올바르지 않습니다.";

/// One request as the stub backend saw it
#[derive(Debug, Clone)]
struct Recorded {
    path: String,
    authorization: Option<String>,
    request_id: Option<String>,
    query: HashMap<String, String>,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Stub {
    requests: Arc<Mutex<Vec<Recorded>>>,
    survey: Arc<Mutex<Option<Value>>>,
}

impl Stub {
    fn record(
        &self,
        path: &str,
        headers: &HeaderMap,
        query: HashMap<String, String>,
        body: Option<Value>,
    ) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(Recorded {
            path: path.to_string(),
            authorization: header("authorization"),
            request_id: header(REQUEST_ID_HEADER),
            query,
            body,
        });
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn last(&self, path: &str) -> Recorded {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.path == path)
            .unwrap_or_else(|| panic!("no request to {}", path))
    }
}

fn hobby(id: i64, name: &str, category: &str) -> Value {
    json!({
        "hobby_id": id,
        "name": name,
        "category": category,
        "description": null,
        "indoor_outdoor": "both",
        "social_individual": "both",
        "required_budget": "low",
        "difficulty_level": 2,
        "physical_intensity": 3,
        "creativity_level": 2,
        "average_rating": 4.5,
        "rating_count": 2
    })
}

fn catalog() -> Vec<Value> {
    vec![
        hobby(1, "요가", "운동"),
        hobby(2, "등산", "운동"),
        hobby(4, "수채화", "예술"),
        hobby(7, "우쿨렐레", "음악"),
    ]
}

async fn login(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.record("/auth/login", &headers, HashMap::new(), Some(body.clone()));
    if body["password"] == "correct-horse" {
        (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": "로그인 성공",
                "data": {
                    "access_token": "tok-123",
                    "token_type": "Bearer",
                    "user": { "user_id": 1, "username": body["username"], "name": "김취미" }
                }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized", "message": BAD_LOGIN_MESSAGE })),
        )
    }
}

async fn logout(State(stub): State<Stub>, headers: HeaderMap) -> Json<Value> {
    stub.record("/auth/logout", &headers, HashMap::new(), None);
    Json(json!({ "status": "success", "message": "로그아웃 되었습니다." }))
}

async fn hobbies(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    stub.record("/hobbies", &headers, query.clone(), None);
    let hobbies: Vec<Value> = catalog()
        .into_iter()
        .filter(|h| query.get("category").map_or(true, |c| h["category"] == *c))
        .collect();
    Json(json!({
        "status": "success",
        "data": { "hobbies": hobbies, "pagination": { "page": 1, "total": hobbies.len() } }
    }))
}

async fn hobby_detail(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Path(hobby_id): Path<i64>,
) -> (StatusCode, Json<Value>) {
    stub.record("/hobbies/:id", &headers, HashMap::new(), None);
    match catalog().into_iter().find(|h| h["hobby_id"] == hobby_id) {
        Some(mut hobby) => {
            hobby["recent_reviews"] = json!([]);
            (StatusCode::OK, Json(json!({ "status": "success", "data": hobby })))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Hobby Not Found", "message": "취미를 찾을 수 없습니다." })),
        ),
    }
}

async fn submit_survey(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record("/survey/submit", &headers, HashMap::new(), Some(body.clone()));
    *stub.survey.lock().unwrap() = Some(body["responses"].clone());
    Json(json!({ "status": "success", "message": "설문 응답이 저장되었습니다." }))
}

async fn recommendations(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    stub.record("/recommendations", &headers, query, None);
    if stub.survey.lock().unwrap().is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Profile Not Found",
                "message": "사용자 프로필이 없습니다. 먼저 설문조사를 완료해주세요."
            })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "data": {
                "recommendations": [
                    { "hobby": hobby(4, "수채화", "예술"), "recommendation_score": 0.95, "match_percentage": 95.0 },
                    { "hobby": hobby(1, "요가", "운동"), "recommendation_score": 0.88, "match_percentage": 88.0 },
                    { "hobby": hobby(7, "우쿨렐레", "음악"), "recommendation_score": 0.82, "match_percentage": 82.0 }
                ],
                "total": 3
            }
        })),
    )
}

/// Starts the stub backend on an ephemeral port
async fn spawn_backend() -> (SocketAddr, Stub) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/hobbies", get(hobbies))
        .route("/api/hobbies/:id", get(hobby_detail))
        .route("/api/survey/submit", post(submit_survey))
        .route("/api/recommendations", get(recommendations))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, stub)
}

fn client_state(addr: SocketAddr, store: Arc<dyn LocalStore>) -> AppState {
    let config = Config {
        api_base_url: format!("http://{}/api", addr),
        ..Config::default()
    };
    AppState::with_store(config, store).unwrap()
}

#[tokio::test]
async fn test_bearer_header_follows_set_token() {
    let (addr, stub) = spawn_backend().await;
    let state = client_state(addr, Arc::new(MemoryStore::new()));
    let filters = HobbyFilters::default();

    state.api.hobbies(&filters).await.unwrap();
    assert_eq!(stub.last("/hobbies").authorization, None);

    state.session.set_token(Some("abc".to_string())).unwrap();
    state.api.hobbies(&filters).await.unwrap();
    state.api.hobbies(&filters).await.unwrap();
    let authorized: Vec<_> = stub.requests()[1..]
        .iter()
        .map(|r| r.authorization.clone())
        .collect();
    assert_eq!(
        authorized,
        vec![Some("Bearer abc".to_string()), Some("Bearer abc".to_string())]
    );

    state.session.set_token(None).unwrap();
    state.api.hobbies(&filters).await.unwrap();
    assert_eq!(stub.last("/hobbies").authorization, None);
}

#[tokio::test]
async fn test_every_request_carries_a_fresh_request_id() {
    let (addr, stub) = spawn_backend().await;
    let state = client_state(addr, Arc::new(MemoryStore::new()));

    state.api.hobbies(&HobbyFilters::default()).await.unwrap();
    state.api.hobbies(&HobbyFilters::default()).await.unwrap();

    let ids: Vec<String> = stub
        .requests()
        .into_iter()
        .map(|r| r.request_id.expect("request id header"))
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_failed_login_surfaces_server_message_and_stays_anonymous() {
    let (addr, _stub) = spawn_backend().await;
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let state = client_state(addr, store.clone());

    let err = state
        .session
        .login(
            &state.api,
            &LoginRequest {
                username: "hobby_fan".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.user_message("Login failed."), BAD_LOGIN_MESSAGE);
    assert!(!state.session.is_authenticated());
    assert_eq!(store.get(StorageKey::Token).unwrap(), None);
    assert_eq!(store.get(StorageKey::User).unwrap(), None);
}

#[tokio::test]
async fn test_login_persists_session_and_logout_clears_it() {
    let (addr, stub) = spawn_backend().await;
    let store: Arc<dyn LocalStore> = Arc::new(MemoryStore::new());
    let state = client_state(addr, store.clone());

    let user = state
        .session
        .login(
            &state.api,
            &LoginRequest {
                username: "hobby_fan".to_string(),
                password: "correct-horse".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(user.display_name(), "김취미");
    assert_eq!(store.get(StorageKey::Token).unwrap().as_deref(), Some("tok-123"));
    assert!(store.get(StorageKey::User).unwrap().is_some());

    // a restarted client picks the session back up from storage
    let restarted = client_state(addr, store.clone());
    assert_eq!(restarted.session.user().unwrap().username, "hobby_fan");

    state.session.logout(&state.api).await.unwrap();
    assert_eq!(
        stub.last("/auth/logout").authorization.as_deref(),
        Some("Bearer tok-123")
    );
    assert!(!state.session.is_authenticated());
    assert_eq!(store.get(StorageKey::Token).unwrap(), None);
    assert_eq!(store.get(StorageKey::User).unwrap(), None);
}

#[tokio::test]
async fn test_category_filter_is_sent_and_respected() {
    let (addr, stub) = spawn_backend().await;
    let state = client_state(addr, Arc::new(MemoryStore::new()));
    let mut browser = CatalogBrowser::new(state.providers.catalog.clone());

    let hobbies = browser
        .apply(HobbyFilters::by_category("운동"))
        .await
        .ready()
        .cloned()
        .unwrap();

    let query = stub.last("/hobbies").query;
    assert_eq!(query.get("category").map(String::as_str), Some("운동"));
    assert_eq!(query.len(), 1);
    assert_eq!(hobbies.len(), 2);
    assert!(hobbies.iter().all(|h| h.category == "운동"));

    // a second apply is a second fetch
    browser.apply(HobbyFilters::default()).await;
    assert_eq!(stub.requests().len(), 2);
    assert!(stub.last("/hobbies").query.is_empty());
}

#[tokio::test]
async fn test_unknown_hobby_is_not_found() {
    let (addr, _stub) = spawn_backend().await;
    let state = client_state(addr, Arc::new(MemoryStore::new()));
    let browser = CatalogBrowser::new(state.providers.catalog.clone());

    let err = browser.detail(404).await.unwrap_err();
    assert_eq!(err.user_message("Could not load this hobby."), "취미를 찾을 수 없습니다.");
    assert_eq!(browser.detail(1).await.unwrap().hobby.name, "요가");
}

#[tokio::test]
async fn test_survey_then_recommendations() {
    let (addr, stub) = spawn_backend().await;
    let state = client_state(addr, Arc::new(MemoryStore::new()));
    state.session.set_token(Some("tok-123".to_string())).unwrap();

    // no survey yet: an explicit survey-required state, not an empty list
    let mut view = RecommendationView::new(state.providers.engine.clone(), 10);
    assert!(view.load().await.error().unwrap().is_survey_required());
    assert_eq!(
        stub.last("/recommendations").query.get("limit").map(String::as_str),
        Some("10")
    );

    let mut flow = SurveyFlow::new();
    for (key, value) in QuestionKey::ALL
        .into_iter()
        .zip(["indoor", "alone", "moderate", "yes", "medium"])
    {
        flow.answer(key, value).unwrap();
        flow.advance();
    }
    flow.submit(state.providers.surveys.as_ref()).await.unwrap();

    let submitted = stub.last("/survey/submit");
    assert_eq!(submitted.authorization.as_deref(), Some("Bearer tok-123"));
    assert_eq!(
        submitted.body.unwrap(),
        json!({
            "responses": {
                "indoor_outdoor": "indoor",
                "social_preference": "alone",
                "physical_activity": "moderate",
                "creative_interest": "yes",
                "budget": "medium"
            }
        })
    );

    let recommendations = view.load().await.ready().cloned().unwrap();
    let ranked: Vec<(usize, &str)> = recommendations
        .iter()
        .map(|r| (r.rank, r.hobby.name.as_str()))
        .collect();
    assert_eq!(ranked, vec![(1, "수채화"), (2, "요가"), (3, "우쿨렐레")]);
    assert_eq!(recommendations[0].match_score.to_string(), "95%");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let state = client_state(addr, Arc::new(MemoryStore::new()));
    let err = state.api.hobbies(&HobbyFilters::default()).await.unwrap_err();
    assert!(matches!(err, hobby_client::error::AppError::Transport(_)));
    assert_eq!(err.user_message("Could not reach the server."), "Could not reach the server.");
}
