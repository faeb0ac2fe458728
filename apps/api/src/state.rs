use sqlx::SqlitePool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::notify::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The LLM client and mailer are constructed exactly once at startup and
/// reused across requests; handlers never build their own.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub llm: LlmClient,
    pub mailer: Mailer,
    pub config: Config,
}
