pub mod emotion_client;
pub mod responder;

// Re-export for convenience
pub use emotion_client::{ClassifierError, EmotionApiClient, EmotionClassifier};
pub use responder::generate_response;
