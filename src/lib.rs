//! Emotion Chat - classifies a message's tone, answers it, and records the exchange

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod storage;

// Re-export main types for convenience
pub use crate::api::dto::*;
pub use crate::api::routes::{create_router, AppState};
pub use crate::config::Config;
pub use crate::models::internal::{ConversationRecord, NewConversationRecord};
pub use crate::services::emotion_client::{EmotionApiClient, EmotionClassifier};
pub use crate::storage::db::init_db;
pub use crate::storage::repository::{ConversationRepository, SeaOrmConversationRepository};
