use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Emotion API credentials not configured")]
    NotConfigured,
    #[error("API error: {status} - {message}")]
    Upstream { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Returns the label with the highest score for `message`.
    async fn detect_emotion(&self, message: &str) -> Result<String, ClassifierError>;
}

/// Client for a hosted emotion detection API that answers `{label: score}`.
#[derive(Clone)]
pub struct EmotionApiClient {
    client: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl EmotionApiClient {
    pub fn new(api_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.filter(|s| !s.trim().is_empty()),
            api_key: api_key.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_url.is_some() && self.api_key.is_some()
    }
}

#[async_trait]
impl EmotionClassifier for EmotionApiClient {
    async fn detect_emotion(&self, message: &str) -> Result<String, ClassifierError> {
        let (Some(api_url), Some(api_key)) = (&self.api_url, &self.api_key) else {
            return Err(ClassifierError::NotConfigured);
        };

        let request = DetectRequest { text: message };

        let response = self
            .client
            .post(api_url.as_str())
            .header("apikey", api_key.as_str())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassifierError::Upstream {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        let scores: Value = serde_json::from_str(&body)
            .map_err(|e| ClassifierError::InvalidResponse(format!("body is not JSON: {}", e)))?;

        dominant_emotion(&scores)
    }
}

/// Picks the highest-scoring label. On a tie the label that appears first in
/// the response wins.
pub fn dominant_emotion(scores: &Value) -> Result<String, ClassifierError> {
    let map = scores.as_object().ok_or_else(|| {
        ClassifierError::InvalidResponse("expected an object of emotion scores".to_string())
    })?;

    let mut best: Option<(&String, f64)> = None;
    for (label, value) in map {
        let score = value.as_f64().ok_or_else(|| {
            ClassifierError::InvalidResponse(format!("score for '{}' is not a number", label))
        })?;

        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((label, score)),
        }
    }

    best.map(|(label, _)| label.clone())
        .ok_or_else(|| ClassifierError::InvalidResponse("no emotion scores returned".to_string()))
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    text: &'a str,
}
