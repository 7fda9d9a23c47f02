use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Question joined with its author's display name.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub question_id: i64,
    pub question_text: String,
    pub event_id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionInfo {
    pub id: i64,
    pub content: String,
    pub event_id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<QuestionRow> for QuestionInfo {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.question_id,
            content: row.question_text,
            event_id: row.event_id,
            user_id: row.user_id,
            author_name: row.author_name,
            upvotes: row.upvotes,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub content: Option<String>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub content: Option<String>,
}
