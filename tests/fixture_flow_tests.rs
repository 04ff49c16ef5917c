use hobby_client::{
    api::AppState,
    config::{Config, DataSource},
    models::{HobbyFilters, QuestionKey, RatingRequest},
    services::{Badge, CatalogBrowser, RecommendationView, SurveyFlow},
    storage::StorageKey,
};

fn fixture_state(dir: &tempfile::TempDir) -> AppState {
    let config = Config {
        data_source: DataSource::Fixture,
        storage_dir: dir.path().to_path_buf(),
        // nothing listens here; fixture mode must never need it
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        ..Config::default()
    };
    AppState::from_config(config).unwrap()
}

fn answer_survey(flow: &mut SurveyFlow, answers: [&str; 5]) {
    for value in answers {
        flow.answer_current(value).unwrap();
        flow.advance();
    }
}

#[tokio::test]
async fn test_offline_survey_to_recommendations() {
    let dir = tempfile::tempdir().unwrap();
    let state = fixture_state(&dir);

    let mut view = RecommendationView::new(state.providers.engine.clone(), 5);
    assert!(view.load().await.error().unwrap().is_survey_required());

    let mut flow = SurveyFlow::new();
    answer_survey(&mut flow, ["indoor", "alone", "low", "yes", "medium"]);
    assert_eq!(flow.progress(), 1.0);
    flow.submit(state.providers.surveys.as_ref()).await.unwrap();

    let stored = std::fs::read_to_string(dir.path().join("survey_responses")).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["creative_interest"], "yes");

    let recommendations = view.load().await.ready().cloned().unwrap();
    assert_eq!(recommendations.len(), 5);
    assert_eq!(recommendations[0].rank, 1);
    assert_eq!(recommendations[0].badge(), Badge::TopPick);
    assert!(recommendations
        .windows(2)
        .all(|w| w[0].match_score >= w[1].match_score));
    // an indoor, creative, low-intensity profile should not top out on hiking
    assert_ne!(recommendations[0].hobby.name, "등산");
}

#[tokio::test]
async fn test_survey_record_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let state = fixture_state(&dir);
        let mut flow = SurveyFlow::new();
        answer_survey(&mut flow, ["outdoor", "group", "high", "no", "high"]);
        flow.submit(state.providers.surveys.as_ref()).await.unwrap();
    }

    let state = fixture_state(&dir);
    assert!(state
        .session
        .store()
        .get(StorageKey::SurveyResponses)
        .unwrap()
        .is_some());

    let mut flow = SurveyFlow::new();
    flow.answer(QuestionKey::IndoorOutdoor, "outdoor").unwrap();
    assert!(!flow.can_submit());

    let mut view = RecommendationView::new(state.providers.engine.clone(), 3);
    let top = view.load().await.ready().cloned().unwrap();
    assert_eq!(top.len(), 3);
}

#[tokio::test]
async fn test_offline_catalog_browsing_and_rating() {
    let dir = tempfile::tempdir().unwrap();
    let state = fixture_state(&dir);
    let mut browser = CatalogBrowser::new(state.providers.catalog.clone());

    let music = browser
        .apply(HobbyFilters::by_category("음악"))
        .await
        .ready()
        .cloned()
        .unwrap();
    let names: Vec<&str> = music.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["우쿨렐레", "하모니카"]);

    let result = browser
        .rate(
            8,
            &RatingRequest {
                rating: 5,
                review_text: Some("어디서나 연주할 수 있어요".to_string()),
                experienced: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(result.updated_stats.rating_count, 5);

    let detail = browser.detail(8).await.unwrap();
    assert_eq!(detail.hobby.rating_count, Some(5));
    assert_eq!(detail.recent_reviews.len(), 1);
}
