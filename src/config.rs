use std::env;
use std::time::Duration;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_ADMIN_EMAIL: &str = "admin@studymate.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => StorageBackend::Memory,
            _ => StorageBackend::Mongo,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub storage_backend: StorageBackend,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub llm_api_base: String,
    pub llm_api_key: SecretString,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub youtube_api_base: String,
    pub youtube_api_key: Option<SecretString>,
    pub video_timeout_secs: u64,
    pub search_base_url: String,
    pub scrape_timeout_secs: u64,
    pub admin_email: String,
    pub admin_password: SecretString,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn secs_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: var_or("APP_ENV", "development"),
            storage_backend: StorageBackend::parse(&var_or("STORAGE_BACKEND", "mongo")),
            mongo_conn_string: var_or("MONGO_CONN_STRING", "mongodb://localhost:27017"),
            mongo_db_name: var_or("MONGO_DB_NAME", "studymate-local"),
            web_server_host: var_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            llm_api_base: var_or("LLM_API_BASE", "https://api.groq.com/openai/v1"),
            llm_api_key: SecretString::from(var_or("LLM_API_KEY", "")),
            llm_model: var_or("LLM_MODEL", "llama-3.3-70b-versatile"),
            llm_timeout_secs: secs_or("LLM_TIMEOUT_SECS", 30),
            youtube_api_base: var_or(
                "YOUTUBE_API_BASE",
                "https://www.googleapis.com/youtube/v3",
            ),
            youtube_api_key: env::var("YOUTUBE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .map(SecretString::from),
            video_timeout_secs: secs_or("VIDEO_TIMEOUT_SECS", 10),
            search_base_url: var_or("SEARCH_BASE_URL", "https://html.duckduckgo.com/html/"),
            scrape_timeout_secs: secs_or("SCRAPE_TIMEOUT_SECS", 5),
            admin_email: var_or("ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL),
            admin_password: SecretString::from(var_or("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD)),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn video_timeout(&self) -> Duration {
        Duration::from_secs(self.video_timeout_secs)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }

    /// Rejects default credentials and a missing model key.
    pub fn validate_for_production(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        if self.admin_password.expose_secret() == DEFAULT_ADMIN_PASSWORD {
            return Err(AppError::ValidationError(
                "ADMIN_PASSWORD is using its default value".to_string(),
            ));
        }

        if self.llm_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "LLM_API_KEY must be set".to_string(),
            ));
        }

        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            storage_backend: StorageBackend::Memory,
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "studymate-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 5000,
            llm_api_base: "http://127.0.0.1:9/v1".to_string(),
            llm_api_key: SecretString::from("test-llm-key".to_string()),
            llm_model: "test-model".to_string(),
            llm_timeout_secs: 1,
            youtube_api_base: "http://127.0.0.1:9/youtube/v3".to_string(),
            youtube_api_key: None,
            video_timeout_secs: 1,
            search_base_url: "http://127.0.0.1:9/html/".to_string(),
            scrape_timeout_secs: 1,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: SecretString::from("test-admin-password".to_string()),
        }
    }
}
