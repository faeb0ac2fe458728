pub mod health;

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::auth::handlers as auth;
use crate::builder::handlers as builder;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/v1/auth/signup", post(auth::handle_signup))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        // Analysis pipeline + history
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/history", get(analysis::handle_history))
        .route("/api/v1/history/:id", get(analysis::handle_get_record))
        .route("/api/v1/report/latest/pdf", get(analysis::handle_latest_pdf))
        .route("/api/v1/report/:id/pdf", get(analysis::handle_record_pdf))
        .route(
            "/api/v1/report/latest/email",
            post(analysis::handle_email_latest),
        )
        .route(
            "/api/v1/report/:id/email",
            post(analysis::handle_email_record),
        )
        // Resume builder
        .route("/api/v1/resumes/build", post(builder::handle_build))
        .route("/api/v1/resumes/generate", post(builder::handle_generate))
        .route(
            "/api/v1/resumes/generate/detailed",
            post(builder::handle_generate_detailed),
        )
        .route("/api/v1/resumes/pdf", get(builder::handle_resume_pdf))
        .with_state(state)
}

/// Wraps PDF bytes in an attachment download response.
pub fn pdf_response(filename: &str, pdf: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{filename}\"");
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/pdf"),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        pdf,
    )
        .into_response()
}
