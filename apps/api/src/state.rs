use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::proposal::assets::AssetCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generation backend. `LlmClient` in production, scripted fakes in tests.
    pub generator: Arc<dyn TextGenerator>,
    /// Portfolio catalog, loaded once at startup and never mutated.
    pub catalog: Arc<AssetCatalog>,
    /// Outbound client for deferred slash-command replies.
    pub http: reqwest::Client,
    pub config: Config,
}
