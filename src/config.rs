use serde::Deserialize;
use validator::Validate;

/// Default configuration file, looked up relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "emotion-chat";

/// Main configuration for the emotion chat backend
#[derive(Debug, Deserialize, Validate, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to
    pub server_host: String,

    /// HTTP server port
    #[validate(range(min = 1024, max = 65535))]
    pub server_port: u16,

    /// Database URL (SQLite or PostgreSQL)
    pub database_url: String,

    /// Maximum database connections
    #[validate(range(min = 1, max = 100))]
    pub max_connections: u32,

    /// Log level (e.g., info, debug, trace)
    pub log_level: String,

    /// Emotion detection endpoint; requests fail with a configuration error while unset
    pub emotion_api_url: Option<String>,

    /// Key sent in the `apikey` header of every emotion detection call
    pub emotion_api_key: Option<String>,
}

impl Config {
    /// Loads configuration from `EMOTION_CHAT_CONFIG` (or `./emotion-chat.toml`)
    /// and the process environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("EMOTION_CHAT_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            // Core defaults
            .set_default("server_host", "127.0.0.1")?
            .set_default("server_port", 8000)?
            .set_default("database_url", "sqlite://data/conversations.db")?
            .set_default("max_connections", 10)?
            .set_default("log_level", "info")?
            .add_source(config::File::with_name(path).required(false))
            // Environment overrides: EMOTION_CHAT__SERVER_PORT, EMOTION_CHAT__DATABASE_URL, etc.
            .add_source(config::Environment::with_prefix("EMOTION_CHAT").separator("__"))
            // Credentials keep their historical variable names
            .set_override_option("emotion_api_url", non_empty_env("EMOTION_API_URL"))?
            .set_override_option("emotion_api_key", non_empty_env("EMOTION_API_KEY"))?
            .build()?;

        let cfg: Config = settings.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
