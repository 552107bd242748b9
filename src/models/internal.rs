use chrono::{DateTime, FixedOffset};

use crate::storage::entities::conversations;

/// A stored exchange: what the user said, how it was read, and what we answered.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRecord {
    pub id: i32,
    pub user_message: String,
    pub emotion: String,
    pub bot_response: String,
    /// Assigned by the database at insert time
    pub timestamp: DateTime<FixedOffset>,
}

/// Content fields for a record that has not been written yet.
#[derive(Debug, Clone)]
pub struct NewConversationRecord {
    pub user_message: String,
    pub emotion: String,
    pub bot_response: String,
}

impl From<conversations::Model> for ConversationRecord {
    fn from(model: conversations::Model) -> Self {
        Self {
            id: model.id,
            user_message: model.user_message,
            emotion: model.emotion,
            bot_response: model.bot_response,
            timestamp: model.timestamp,
        }
    }
}
