use async_trait::async_trait;
use sea_orm::{prelude::*, ActiveValue::NotSet, Set, TransactionTrait};

use crate::models::internal::{ConversationRecord, NewConversationRecord};
use crate::storage::entities::conversations;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Writes a record and returns it as stored, with the id and timestamp the
    /// database assigned. Nothing is written unless the whole call succeeds.
    async fn append(&self, record: NewConversationRecord)
        -> Result<ConversationRecord, RepositoryError>;

    /// Reads a stored record back by id. Conversations are never served over
    /// HTTP, so this is for callers that inspect what `append` wrote.
    async fn find_by_id(&self, id: i32) -> Result<Option<ConversationRecord>, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;
}

pub struct SeaOrmConversationRepository {
    db: DatabaseConnection,
}

impl SeaOrmConversationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConversationRepository for SeaOrmConversationRepository {
    async fn append(
        &self,
        record: NewConversationRecord,
    ) -> Result<ConversationRecord, RepositoryError> {
        // Dropping the transaction on any early return rolls it back and frees the connection
        let txn = self.db.begin().await?;

        let active_model = conversations::ActiveModel {
            id: NotSet,
            user_message: Set(record.user_message),
            emotion: Set(record.emotion),
            bot_response: Set(record.bot_response),
            timestamp: NotSet,
        };

        let stored = active_model.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!("Stored conversation {} ({})", stored.id, stored.emotion);
        Ok(stored.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<ConversationRecord>, RepositoryError> {
        let model = conversations::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count = conversations::Entity::find().count(&self.db).await?;
        Ok(count)
    }
}
