//! Accounts and session identity.
//!
//! Passwords are stored as salted argon2 PHC strings. The logged-in identity
//! and the per-browser transient state (latest result, generated resume)
//! live in a server-side session keyed by a signed cookie.

pub mod handlers;

use anyhow::anyhow;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::errors::AppError;
use crate::models::user::User;

// Session keys. `LATEST_RESULT`/`LATEST_ROLE` and `GENERATED_RESUME` are
// last-write-wins across concurrent tabs of the same user.
pub const SESSION_USER_ID: &str = "user_id";
pub const SESSION_USER_NAME: &str = "user_name";
pub const SESSION_USER_EMAIL: &str = "user_email";
pub const SESSION_LATEST_RESULT: &str = "latest_result";
pub const SESSION_LATEST_ROLE: &str = "latest_role";
pub const SESSION_GENERATED_RESUME: &str = "generated_resume";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow!("Password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Inserts a new user and returns its id. A duplicate email surfaces as a
/// unique-constraint database error; see [`is_unique_violation`].
pub async fn create_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, sqlx::Error> {
    let inserted = sqlx::query(
        "INSERT INTO users (name, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(inserted.last_insert_rowid())
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Returns the logged-in user id or `Unauthorized`. Every route other than
/// health and signup/login goes through this guard.
pub async fn require_user(session: &Session) -> Result<i64, AppError> {
    session
        .get::<i64>(SESSION_USER_ID)
        .await?
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert_ne!(hash, "hunter2-but-longer");
        assert!(verify_password("hunter2-but-longer", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_leaving_one_row() {
        let pool = test_pool().await;

        create_user(&pool, "Ada", "ada@example.com", "hash-1").await.unwrap();
        let second = create_user(&pool, "Imposter", "ada@example.com", "hash-2").await;

        assert!(is_unique_violation(&second.unwrap_err()));

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = 'ada@example.com'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let pool = test_pool().await;
        create_user(&pool, "Ada", "ada@example.com", "hash").await.unwrap();

        let user = find_by_email(&pool, "ada@example.com").await.unwrap().unwrap();
        assert_eq!(user.name, "Ada");
        assert!(find_by_email(&pool, "missing@example.com").await.unwrap().is_none());
    }
}
