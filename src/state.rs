use crate::{ai::GeminiClient, config::Config, storage::DriveClient};

/// Application state shared across all handlers.
///
/// Both clients are constructed once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub drive: DriveClient,
    pub gemini: GeminiClient,
}

impl AppState {
    pub fn new(config: Config, drive: DriveClient, gemini: GeminiClient) -> Self {
        Self {
            config,
            drive,
            gemini,
        }
    }
}
