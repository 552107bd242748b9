use super::{
    classifier_for, conversation_request, create_test_app, create_unmigrated_test_app, json,
    read_json, DETECT_PATH, TEST_API_KEY,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use emotion_chat::{
    services::emotion_client::EmotionApiClient, storage::ConversationRepository,
};
use migration::{Migrator, MigratorTrait};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================
// POST /conversation
// ============================================

#[tokio::test]
async fn test_conversation_happy_path() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DETECT_PATH))
        .and(header("apikey", TEST_API_KEY))
        .and(body_json(json!({ "text": "I got the job!" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "happy": 0.91, "neutral": 0.05 })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(classifier_for(&mock_server)).await;

    let response = app
        .router
        .clone()
        .oneshot(conversation_request(r#"{"message": "I got the job!"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body,
        json!({ "emotion": "happy", "response": "I'm glad to hear that!" })
    );

    assert_eq!(app.repo.count().await.unwrap(), 1);
    let record = app.repo.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(record.user_message, "I got the job!");
    assert_eq!(record.emotion, "happy");
    assert_eq!(record.bot_response, "I'm glad to hear that!");
    let age = chrono::Utc::now().signed_duration_since(record.timestamp);
    assert!(age.num_minutes().abs() < 5, "timestamp {} is not server time", record.timestamp);
}

#[tokio::test]
async fn test_conversation_unknown_label_gets_fallback() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Fear": 0.8, "Sad": 0.1 })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(classifier_for(&mock_server)).await;

    let response = app
        .router
        .clone()
        .oneshot(conversation_request(r#"{"message": "There's a spider"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["emotion"], "Fear");
    assert_eq!(body["response"], "Thanks for sharing how you feel.");
}

#[tokio::test]
async fn test_conversation_upstream_401_stores_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid API key" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_test_app(classifier_for(&mock_server)).await;

    let response = app
        .router
        .clone()
        .oneshot(conversation_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["code"], 500);
    assert!(body["detail"].as_str().unwrap().contains("401"));

    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_conversation_empty_scores_is_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let app = create_test_app(classifier_for(&mock_server)).await;

    let response = app
        .router
        .clone()
        .oneshot(conversation_request(r#"{"message": "..."}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["detail"], "Invalid response from Emotion API.");
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_conversation_without_credentials_is_server_error() {
    let app = create_test_app(EmotionApiClient::new(None, None)).await;

    let response = app
        .router
        .clone()
        .oneshot(conversation_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["detail"], "Emotion API credentials not configured.");
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_error_body_uses_detail_and_code() {
    let app = create_test_app(EmotionApiClient::new(None, None)).await;

    let response = app
        .router
        .clone()
        .oneshot(conversation_request(r#"{"message": "hello"}"#))
        .await
        .unwrap();

    let body = read_json(response).await;
    assert_eq!(
        body,
        json!({ "detail": "Emotion API credentials not configured.", "code": 500 })
    );
}

#[tokio::test]
async fn test_conversation_missing_message_is_rejected_before_classifying() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "happy": 1.0 })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = create_test_app(classifier_for(&mock_server)).await;

    for body in [r#"{}"#, r#"{"text": "hi"}"#, r#"{"message": 42}"#, "not json"] {
        let response = app
            .router
            .clone()
            .oneshot(conversation_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "body {:?}", body);
        let json = read_json(response).await;
        assert_eq!(json["code"], 422);
    }

    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_conversation_storage_failure_is_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sad": 0.8 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = create_unmigrated_test_app(classifier_for(&mock_server)).await;

    let response = app
        .router
        .clone()
        .oneshot(conversation_request(r#"{"message": "I lost my keys"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json(response).await;
    assert_eq!(body["detail"], "Failed to store conversation.");

    // Once the store is usable again the failed write does not show up
    Migrator::up(&app.db, None).await.unwrap();
    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_repeated_requests_are_independent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "neutral": 0.6, "happy": 0.3 })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let app = create_test_app(classifier_for(&mock_server)).await;

    for _ in 0..3 {
        let response = app
            .router
            .clone()
            .oneshot(conversation_request(r#"{"message": "Just another day"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.repo.count().await.unwrap(), 3);
    let first = app.repo.find_by_id(1).await.unwrap().unwrap();
    let third = app.repo.find_by_id(3).await.unwrap().unwrap();
    assert_eq!(first.user_message, third.user_message);
    assert_ne!(first.id, third.id);
}

// ============================================
// Auxiliary endpoints
// ============================================

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(EmotionApiClient::new(None, None)).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metrics_reports_conversation_count() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "angry": 0.9 })))
        .mount(&mock_server)
        .await;

    let app = create_test_app(classifier_for(&mock_server)).await;
    app.router
        .clone()
        .oneshot(conversation_request(r#"{"message": "Stuck in traffic again"}"#))
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("emotion_chat_conversations_total 1"));
}

#[tokio::test]
async fn test_openapi_document_lists_conversation_endpoint() {
    let app = create_test_app(EmotionApiClient::new(None, None)).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = read_json(response).await;
    assert!(doc["paths"]["/conversation"]["post"].is_object());
}

#[tokio::test]
async fn test_metrics_survives_unreadable_store() {
    let app = create_unmigrated_test_app(EmotionApiClient::new(None, None)).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("emotion_chat_conversations_total 0"));
    assert!(text.contains("emotion_chat_up 1"));
}
