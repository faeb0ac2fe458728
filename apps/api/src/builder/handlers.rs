use std::collections::HashMap;

use axum::extract::State;
use axum::response::Response;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;
use tracing::warn;

use crate::auth::{require_user, SESSION_GENERATED_RESUME};
use crate::builder::forms::{field, manual_resume, parse_detailed_entries, BuildForm};
use crate::builder::prompts::build_generation_prompt;
use crate::builder::{fallback_resume, needs_more_detail, BuilderInput, EducationInput, ExperienceInput};
use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::GeneratedResume;
use crate::render::{render_pdf, resume_html};
use crate::routes::pdf_response;
use crate::state::AppState;

/// POST /api/v1/resumes/build
/// Manual builder: assembles the form into the structured resume shape and
/// stores it in the session.
pub async fn handle_build(
    session: Session,
    Form(form): Form<BuildForm>,
) -> Result<Json<Value>, AppError> {
    require_user(&session).await?;

    let resume = manual_resume(&form);
    session.insert(SESSION_GENERATED_RESUME, &resume).await?;

    Ok(Json(json!({
        "status": "ok",
        "ai_generated": false,
        "resume": resume,
    })))
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub education: String,
}

/// POST /api/v1/resumes/generate
/// AI builder from free-text fields. Thin input is bounced back with a
/// `needs_details` outcome so the client can show the detailed form.
pub async fn handle_generate(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GenerateForm>,
) -> Result<Json<Value>, AppError> {
    require_user(&session).await?;

    if needs_more_detail(&form.experience, &form.education) {
        return Ok(Json(json!({
            "status": "needs_details",
            "message": "For a better result, please provide more specific details.",
        })));
    }

    let input = BuilderInput {
        name: form.name,
        email: form.email,
        phone: form.phone,
        job_role: form.job_role,
        skills: form.skills,
        experience: ExperienceInput::FreeText(form.experience),
        education: EducationInput::FreeText(form.education),
    };

    let resume = generate_resume(&state.llm, &input).await?;
    session.insert(SESSION_GENERATED_RESUME, &resume).await?;

    Ok(Json(json!({
        "status": "ok",
        "ai_generated": true,
        "message": "Your professional resume has been generated by AI!",
        "resume": resume,
    })))
}

/// POST /api/v1/resumes/generate/detailed
/// AI builder from the detailed form with index-suffixed experience and
/// education entries (`exp-title-0`, `exp-title-1`, ...).
pub async fn handle_generate_detailed(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<Value>, AppError> {
    require_user(&session).await?;

    let (experience, education) = parse_detailed_entries(&form);
    let input = BuilderInput {
        name: field(&form, "name"),
        email: field(&form, "email"),
        phone: field(&form, "phone"),
        job_role: field(&form, "job_role"),
        skills: field(&form, "skills"),
        experience: ExperienceInput::Structured(experience),
        education: EducationInput::Structured(education),
    };

    let resume = generate_resume(&state.llm, &input).await?;
    session.insert(SESSION_GENERATED_RESUME, &resume).await?;

    Ok(Json(json!({
        "status": "ok",
        "ai_generated": true,
        "message": "Your professional resume has been generated by AI with your detailed input!",
        "resume": resume,
    })))
}

/// GET /api/v1/resumes/pdf
/// Renders the session's generated resume to a PDF download.
pub async fn handle_resume_pdf(session: Session) -> Result<Response, AppError> {
    require_user(&session).await?;

    let resume: GeneratedResume = session
        .get(SESSION_GENERATED_RESUME)
        .await?
        .ok_or_else(|| {
            AppError::Validation("No resume data available to download.".to_string())
        })?;

    let pdf = render_pdf(&resume_html(&resume)).map_err(|e| AppError::Render(e.to_string()))?;

    let name = if resume.name.trim().is_empty() {
        "Resume".to_string()
    } else {
        resume.name.replace(' ', "_")
    };
    Ok(pdf_response(&format!("{name}_Resume.pdf"), pdf))
}

/// Runs the generation prompt and parses the response. A missing API key is
/// a hard error; a malformed model response degrades to the fallback payload
/// echoing the user's input.
async fn generate_resume(
    llm: &LlmClient,
    input: &BuilderInput,
) -> Result<GeneratedResume, AppError> {
    let prompt = build_generation_prompt(input);
    match llm.call_json::<GeneratedResume>(&prompt).await {
        Ok(resume) => Ok(resume),
        Err(LlmError::NotInitialized) => {
            Err(AppError::Llm(LlmError::NotInitialized.to_string()))
        }
        Err(e) => {
            warn!("Error generating or parsing AI resume: {e}");
            Ok(fallback_resume(input))
        }
    }
}
