use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One persisted resume-critique result. Immutable after insert; the app
/// exposes no delete or update path for history rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRecord {
    pub id: i64,
    pub user_id: i64,
    pub job_role: String,
    /// Raw AI response text. Opaque: no schema is enforced on its internal
    /// structure; downstream formatting is best-effort pattern matching.
    pub result: String,
    pub created_at: DateTime<Utc>,
}
