use axum::extract::State;
use axum::http::StatusCode;
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;
use tracing::info;

use crate::auth::{
    create_user, find_by_email, hash_password, is_unique_violation, verify_password,
    SESSION_USER_EMAIL, SESSION_USER_ID, SESSION_USER_NAME,
};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    if form.name.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::Validation("All fields are required.".to_string()));
    }

    let password_hash = hash_password(&form.password)?;
    let user_id = create_user(&state.db, form.name.trim(), form.email.trim(), &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email already exists.".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

    info!("New signup: user_id={user_id}");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Signup successful! Please log in.",
            "user_id": user_id,
        })),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<Value>, AppError> {
    let user = find_by_email(&state.db, form.email.trim()).await?;

    let Some(user) = user.filter(|u| verify_password(&form.password, &u.password_hash)) else {
        return Err(AppError::Validation(
            "Invalid email or password.".to_string(),
        ));
    };

    session.insert(SESSION_USER_ID, user.id).await?;
    session.insert(SESSION_USER_NAME, &user.name).await?;
    session.insert(SESSION_USER_EMAIL, &user.email).await?;

    Ok(Json(json!({
        "message": "Login successful!",
        "user": { "id": user.id, "name": user.name, "email": user.email },
    })))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(session: Session) -> Result<Json<Value>, AppError> {
    session.flush().await?;
    Ok(Json(json!({ "message": "You have been logged out." })))
}
