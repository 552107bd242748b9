use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{
    api::{dto::*, error::ApiError},
    config::Config,
    models::internal::NewConversationRecord,
    services::{emotion_client::EmotionApiClient, responder::generate_response, EmotionClassifier},
    storage::repository::{ConversationRepository, SeaOrmConversationRepository},
};

/// Request-independent context shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ConversationRepository + Send + Sync>,
    pub classifier: Arc<dyn EmotionClassifier + Send + Sync>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn ConversationRepository + Send + Sync>,
        classifier: Arc<dyn EmotionClassifier + Send + Sync>,
    ) -> Self {
        Self { repo, classifier }
    }

    /// Wires the SeaORM repository and the HTTP classifier from configuration.
    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        let classifier = EmotionApiClient::new(
            config.emotion_api_url.clone(),
            config.emotion_api_key.clone(),
        );
        if !classifier.is_configured() {
            tracing::warn!(
                "EMOTION_API_URL or EMOTION_API_KEY not set; /conversation will fail until configured"
            );
        }

        Self::new(
            Arc::new(SeaOrmConversationRepository::new(db)),
            Arc::new(classifier),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(create_conversation, health),
    components(schemas(ConversationInput, ConversationOutput, ErrorResponse))
)]
pub struct ApiDoc;

#[utoipa::path(
    post,
    path = "/conversation",
    request_body = ConversationInput,
    responses(
        (status = 200, description = "Detected emotion and reply", body = ConversationOutput),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Classifier or storage failure", body = ErrorResponse)
    )
)]
pub async fn create_conversation(
    State(state): State<AppState>,
    payload: Result<Json<ConversationInput>, JsonRejection>,
) -> Result<Json<ConversationOutput>, ApiError> {
    let Json(input) = payload?;

    let emotion = state.classifier.detect_emotion(&input.message).await?;
    let reply = generate_response(&emotion);

    let record = state
        .repo
        .append(NewConversationRecord {
            user_message: input.message,
            emotion: emotion.clone(),
            bot_response: reply.to_string(),
        })
        .await?;

    tracing::debug!("Conversation {} recorded at {}", record.id, record.timestamp);

    Ok(Json(ConversationOutput {
        emotion,
        response: reply.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "OK"
}

pub async fn metrics(State(state): State<AppState>) -> String {
    let count = match state.repo.count().await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Conversation count unavailable for metrics: {}", e);
            0
        }
    };

    format!(
        "# HELP emotion_chat_conversations_total Total number of stored conversations\n\
         # TYPE emotion_chat_conversations_total gauge\n\
         emotion_chat_conversations_total {}\n\
         # HELP emotion_chat_up Whether the service is up\n\
         # TYPE emotion_chat_up gauge\n\
         emotion_chat_up 1\n",
        count
    )
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/conversation", post(create_conversation))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
