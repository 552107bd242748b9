pub mod db;
pub mod entities;
pub mod repository;

pub use db::{connect, init_db};
pub use entities::conversations;
pub use repository::{ConversationRepository, RepositoryError, SeaOrmConversationRepository};
