use axum::extract::{Multipart, Path, State};
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use tower_sessions::Session;
use tracing::warn;

use crate::analysis::{analyze_resume, get_record, insert_record, list_records};
use crate::auth::{
    require_user, SESSION_LATEST_RESULT, SESSION_LATEST_ROLE, SESSION_USER_EMAIL,
};
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::models::analysis::AnalysisRecord;
use crate::render::{render_pdf, RenderError};
use crate::report::{extract_summary, format_for_web, report_page};
use crate::routes::pdf_response;
use crate::state::AppState;

/// POST /api/v1/analyze
/// The main pipeline: multipart upload -> text extraction -> AI review ->
/// persisted record -> formatted report, optionally emailed as a PDF.
pub async fn handle_analyze(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let user_id = require_user(&session).await?;

    let mut job_role = String::new();
    let mut recipient = String::new();
    let mut filename: Option<String> = None;
    let mut file_bytes: Vec<u8> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        match field.name() {
            Some("resume") => {
                filename = field.file_name().map(str::to_string);
                file_bytes = field.bytes().await.map_err(bad_upload)?.to_vec();
            }
            Some("job_role") => job_role = field.text().await.map_err(bad_upload)?,
            Some("email") => recipient = field.text().await.map_err(bad_upload)?,
            _ => {}
        }
    }

    let job_role = job_role.trim().to_string();
    if job_role.is_empty() {
        return Err(AppError::Validation("Job role is required.".to_string()));
    }
    let Some(filename) = filename.filter(|f| !f.is_empty()) else {
        return Err(AppError::Validation(
            "Resume file not selected.".to_string(),
        ));
    };
    if file_bytes.is_empty() {
        return Err(AppError::Validation(
            "Resume file not selected.".to_string(),
        ));
    }

    let resume_text =
        extract_text(&filename, &file_bytes).map_err(|e| AppError::Validation(e.to_string()))?;

    let result = analyze_resume(&state.llm, &resume_text, &job_role)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let record_id = insert_record(&state.db, user_id, &job_role, &result).await?;

    // Remembered for the follow-up download/email actions in this session.
    session.insert(SESSION_LATEST_RESULT, &result).await?;
    session.insert(SESSION_LATEST_ROLE, &job_role).await?;

    let result_html = format_for_web(&result);
    let summary = extract_summary(&result);

    let mut emailed: Option<bool> = None;
    let mut email_message: Option<&str> = None;
    let recipient = recipient.trim();
    if !recipient.is_empty() {
        match build_report_pdf(&result, &job_role) {
            Ok(pdf) => {
                let sent = state
                    .mailer
                    .send(
                        recipient,
                        &format!("Resume Report for {job_role}"),
                        "Your analysis result is attached.",
                        Some(pdf),
                    )
                    .await;
                emailed = Some(sent);
                email_message = Some(if sent {
                    "Analysis report has been sent to your email!"
                } else {
                    "Could not send email. Please try again later."
                });
            }
            Err(e) => {
                warn!("PDF generation for email failed: {e}");
                emailed = Some(false);
                email_message = Some("Could not generate PDF for email.");
            }
        }
    }

    Ok(Json(json!({
        "message": "Resume analysis completed successfully!",
        "id": record_id,
        "job_role": job_role,
        "result_html": result_html,
        "summary": summary,
        "emailed": emailed,
        "email_message": email_message,
    })))
}

/// GET /api/v1/history
pub async fn handle_history(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<AnalysisRecord>>, AppError> {
    let user_id = require_user(&session).await?;
    let records = list_records(&state.db, user_id).await?;
    Ok(Json(records))
}

/// GET /api/v1/history/:id
pub async fn handle_get_record(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let user_id = require_user(&session).await?;
    let record = owned_record(&state, user_id, id).await?;
    Ok(Json(record))
}

/// GET /api/v1/report/latest/pdf
pub async fn handle_latest_pdf(session: Session) -> Result<Response, AppError> {
    require_user(&session).await?;
    let (result, job_role) = latest_from_session(&session).await?;

    let pdf = build_report_pdf(&result, &job_role).map_err(|e| AppError::Render(e.to_string()))?;
    Ok(pdf_response("Resume_Analysis.pdf", pdf))
}

/// GET /api/v1/report/:id/pdf
pub async fn handle_record_pdf(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let user_id = require_user(&session).await?;
    let record = owned_record(&state, user_id, id).await?;

    let pdf = build_report_pdf(&record.result, &record.job_role)
        .map_err(|e| AppError::Render(e.to_string()))?;
    Ok(pdf_response("Resume_Analysis.pdf", pdf))
}

/// POST /api/v1/report/latest/email
/// Emails the most recent analysis result from the session to the logged-in
/// user's own address.
pub async fn handle_email_latest(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Value>, AppError> {
    require_user(&session).await?;
    let (result, job_role) = latest_from_session(&session).await?;
    email_report(&state, &session, &result, &job_role).await
}

/// POST /api/v1/report/:id/email
pub async fn handle_email_record(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let user_id = require_user(&session).await?;
    let record = owned_record(&state, user_id, id).await?;
    email_report(&state, &session, &record.result, &record.job_role).await
}

async fn owned_record(
    state: &AppState,
    user_id: i64,
    id: i64,
) -> Result<AnalysisRecord, AppError> {
    get_record(&state.db, user_id, id).await?.ok_or_else(|| {
        AppError::NotFound("Analysis not found or you don't have permission.".to_string())
    })
}

async fn latest_from_session(session: &Session) -> Result<(String, String), AppError> {
    let result: Option<String> = session.get(SESSION_LATEST_RESULT).await?;
    let job_role: Option<String> = session.get(SESSION_LATEST_ROLE).await?;
    match (result, job_role) {
        (Some(result), Some(job_role)) => Ok((result, job_role)),
        _ => Err(AppError::Validation(
            "No recent analysis available.".to_string(),
        )),
    }
}

async fn email_report(
    state: &AppState,
    session: &Session,
    result: &str,
    job_role: &str,
) -> Result<Json<Value>, AppError> {
    let recipient: String = session
        .get(SESSION_USER_EMAIL)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let pdf = build_report_pdf(result, job_role).map_err(|e| AppError::Render(e.to_string()))?;

    let sent = state
        .mailer
        .send(
            &recipient,
            &format!("Resume Report for {job_role}"),
            "Find your analysis attached.",
            Some(pdf),
        )
        .await;

    Ok(Json(json!({
        "sent": sent,
        "message": if sent {
            "Analysis report sent to your email!"
        } else {
            "Failed to send email."
        },
    })))
}

fn build_report_pdf(result: &str, job_role: &str) -> Result<Vec<u8>, RenderError> {
    let page = report_page(&format_for_web(result), job_role, Utc::now());
    render_pdf(&page)
}

fn bad_upload(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid upload: {e}"))
}
