mod analysis;
mod auth;
mod builder;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod models;
mod notify;
mod render;
mod report;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::Key, MemoryStore, SessionManagerLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::LlmClient;
use crate::notify::Mailer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on a bad SESSION_SECRET or PORT)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume review API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite and apply the schema idempotently
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize the LLM client — one client, reused across requests.
    // Without an API key the process still runs; analysis is disabled.
    let llm = LlmClient::new(config.gemini_api_key.clone());
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("GEMINI_API_KEY is not set; resume analysis and AI generation are disabled");
    }

    // Initialize the mailer. Without SMTP credentials email delivery is
    // disabled; everything else keeps working.
    let mailer = Mailer::from_config(&config);
    if mailer.is_configured() {
        info!("SMTP mailer initialized (relay: {})", config.smtp_relay);
    } else {
        warn!("SENDER_EMAIL/SENDER_PASSWORD not set; email delivery is disabled");
    }

    // Server-side sessions hold login identity and the per-browser
    // transient state (latest result, generated resume).
    let session_key = Key::derive_from(config.session_secret.as_bytes());
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false) // behind TLS-terminating proxy in production
        .with_signed(session_key);

    // Build app state
    let state = AppState {
        db,
        llm,
        mailer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
