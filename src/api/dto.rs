use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ==================== REQUEST DTOs ====================

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ConversationInput {
    pub message: String,
}

// ==================== RESPONSE DTOs ====================

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ConversationOutput {
    pub emotion: String,
    pub response: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
    pub code: u16,
}
