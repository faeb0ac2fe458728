//! Resume analysis pipeline and history persistence.
//!
//! Pipeline: extracted text + job role -> review prompt -> LLM -> raw
//! critique text, persisted per user and formatted downstream.

pub mod handlers;
pub mod prompts;

use chrono::Utc;
use sqlx::SqlitePool;

use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::AnalysisRecord;

/// Runs the review prompt through the LLM and returns the raw response text.
pub async fn analyze_resume(
    llm: &LlmClient,
    resume_text: &str,
    job_role: &str,
) -> Result<String, LlmError> {
    let prompt = prompts::build_review_prompt(resume_text, job_role);
    llm.call(&prompt).await
}

/// Inserts a completed analysis and returns the new record id.
pub async fn insert_record(
    pool: &SqlitePool,
    user_id: i64,
    job_role: &str,
    result: &str,
) -> Result<i64, sqlx::Error> {
    let inserted = sqlx::query(
        "INSERT INTO analysis_history (user_id, job_role, result, created_at) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(job_role)
    .bind(result)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(inserted.last_insert_rowid())
}

/// Lists a user's analysis history, newest first. Records from other users
/// never appear. Id breaks ties for rows created in the same instant.
pub async fn list_records(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<AnalysisRecord>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, user_id, job_role, result, created_at \
         FROM analysis_history WHERE user_id = $1 \
         ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Fetches a single record by id, scoped to its owner.
pub async fn get_record(
    pool: &SqlitePool,
    user_id: i64,
    record_id: i64,
) -> Result<Option<AnalysisRecord>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, user_id, job_role, result, created_at \
         FROM analysis_history WHERE id = $1 AND user_id = $2",
    )
    .bind(record_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::create_user;
    use crate::db::test_pool;
    use chrono::Duration;

    async fn seed_user(pool: &SqlitePool, email: &str) -> i64 {
        create_user(pool, "Test User", email, "hash").await.unwrap()
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_and_user_scoped() {
        let pool = test_pool().await;
        let user_a = seed_user(&pool, "a@example.com").await;
        let user_b = seed_user(&pool, "b@example.com").await;

        insert_record(&pool, user_a, "Backend Engineer", "first").await.unwrap();
        insert_record(&pool, user_a, "Backend Engineer", "second").await.unwrap();
        insert_record(&pool, user_a, "Backend Engineer", "third").await.unwrap();
        insert_record(&pool, user_b, "Data Engineer", "other user").await.unwrap();

        let records = list_records(&pool, user_a).await.unwrap();
        let results: Vec<&str> = records.iter().map(|r| r.result.as_str()).collect();
        assert_eq!(results, vec!["third", "second", "first"]);
        assert!(records.iter().all(|r| r.user_id == user_a));
    }

    #[tokio::test]
    async fn test_listing_orders_by_created_at_over_insert_order() {
        let pool = test_pool().await;
        let user = seed_user(&pool, "c@example.com").await;

        insert_record(&pool, user, "Role", "recent").await.unwrap();
        // A backdated row inserted later (larger id) must still sort last.
        sqlx::query(
            "INSERT INTO analysis_history (user_id, job_role, result, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user)
        .bind("Role")
        .bind("backdated")
        .bind(Utc::now() - Duration::hours(1))
        .execute(&pool)
        .await
        .unwrap();

        let records = list_records(&pool, user).await.unwrap();
        let results: Vec<&str> = records.iter().map(|r| r.result.as_str()).collect();
        assert_eq!(results, vec!["recent", "backdated"]);
    }

    #[tokio::test]
    async fn test_get_record_is_owner_scoped() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner@example.com").await;
        let other = seed_user(&pool, "other@example.com").await;

        let id = insert_record(&pool, owner, "Role", "text").await.unwrap();

        assert!(get_record(&pool, owner, id).await.unwrap().is_some());
        assert!(get_record(&pool, other, id).await.unwrap().is_none());
    }
}
