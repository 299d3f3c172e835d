use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub drive: DriveConfig,
    pub gemini: GeminiConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote document repository (Google Drive) settings.
///
/// The access token is obtained out-of-band; per-request authentication is
/// the repository's concern, not this service's.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    pub access_token: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Character budget for the assembled context. A heuristic, not a
    /// token-exact guarantee for the answering backend.
    pub max_context_chars: usize,
    pub fetch_timeout_seconds: u64,
    pub answer_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("Failed to parse PORT")?,
            },
            drive: DriveConfig {
                access_token: env::var("DRIVE_ACCESS_TOKEN")
                    .context("DRIVE_ACCESS_TOKEN must be set")?,
                api_base: env::var("DRIVE_API_BASE")
                    .unwrap_or_else(|_| "https://www.googleapis.com/drive/v3".to_string()),
            },
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?,
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
                api_base: env::var("GEMINI_API_BASE").unwrap_or_else(|_| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
            },
            pipeline: PipelineConfig {
                max_context_chars: env::var("MAX_CONTEXT_CHARS")
                    .unwrap_or_else(|_| "30000".to_string())
                    .parse()
                    .context("Failed to parse MAX_CONTEXT_CHARS")?,
                fetch_timeout_seconds: env::var("FETCH_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Failed to parse FETCH_TIMEOUT_SECONDS")?,
                answer_timeout_seconds: env::var("ANSWER_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .context("Failed to parse ANSWER_TIMEOUT_SECONDS")?,
            },
        };

        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
