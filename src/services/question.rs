//! Question service: event-scoped Q&A with per-voter guarded upvotes.

use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::models::question::{CreateQuestionRequest, QuestionInfo, QuestionRow};
use crate::profanity;
use crate::utils::error::{AppError, AppResult};

const QUESTION_SELECT: &str = "SELECT q.question_id, q.question_text, q.event_id, q.user_id, \
     u.first_name || ' ' || u.last_name AS author_name, q.upvotes, q.created_at \
     FROM questions q JOIN users u ON u.user_id = q.user_id";

/// Ranking contract: most upvoted first, ties broken newest-first.
pub async fn list_questions(pool: &SqlitePool, event_id: i64) -> AppResult<Vec<QuestionInfo>> {
    let rows = sqlx::query_as::<_, QuestionRow>(&format!(
        "{QUESTION_SELECT} WHERE q.event_id = ? \
         ORDER BY q.upvotes DESC, q.created_at DESC, q.question_id DESC"
    ))
    .bind(event_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(QuestionInfo::from).collect())
}

pub async fn create_question(
    pool: &SqlitePool,
    event_id: i64,
    req: CreateQuestionRequest,
) -> AppResult<QuestionInfo> {
    let content = req.content.as_deref().map(str::trim).unwrap_or_default();
    let Some(user_id) = req.user_id else {
        return Err(AppError::Validation(
            "Content and user_id are required".to_string(),
        ));
    };
    if content.is_empty() {
        return Err(AppError::Validation(
            "Content and user_id are required".to_string(),
        ));
    }
    if profanity::contains_profanity(content) {
        return Err(AppError::ContentPolicy(
            "Question contains inappropriate language".to_string(),
        ));
    }

    let event_exists = sqlx::query_scalar::<_, i64>("SELECT event_id FROM events WHERE event_id = ?")
        .bind(event_id)
        .fetch_optional(pool)
        .await?;
    if event_exists.is_none() {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    let author_exists = sqlx::query_scalar::<_, i64>("SELECT user_id FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    if author_exists.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let inserted = sqlx::query(
        "INSERT INTO questions (question_text, event_id, user_id, upvotes, created_at) \
         VALUES (?, ?, ?, 0, ?)",
    )
    .bind(content)
    .bind(event_id)
    .bind(user_id)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;

    get_question(pool, inserted.last_insert_rowid()).await
}

pub async fn get_question(pool: &SqlitePool, question_id: i64) -> AppResult<QuestionInfo> {
    let row = sqlx::query_as::<_, QuestionRow>(&format!(
        "{QUESTION_SELECT} WHERE q.question_id = ?"
    ))
    .bind(question_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;
    Ok(row.into())
}

/// The caller must be the question's author.
async fn ensure_author(pool: &SqlitePool, question_id: i64, caller: &AuthUser) -> AppResult<()> {
    let author = sqlx::query_scalar::<_, i64>("SELECT user_id FROM questions WHERE question_id = ?")
        .bind(question_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;

    if author != caller.user_id {
        return Err(AppError::Forbidden(
            "Only the question author can modify this question".to_string(),
        ));
    }
    Ok(())
}

pub async fn update_question(
    pool: &SqlitePool,
    question_id: i64,
    caller: &AuthUser,
    content: Option<String>,
) -> AppResult<()> {
    ensure_author(pool, question_id, caller).await?;

    let content = content.as_deref().map(str::trim).unwrap_or_default();
    if content.is_empty() {
        return Err(AppError::Validation("Content is required".to_string()));
    }

    let updated = sqlx::query("UPDATE questions SET question_text = ? WHERE question_id = ?")
        .bind(content)
        .bind(question_id)
        .execute(pool)
        .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }
    Ok(())
}

pub async fn delete_question(
    pool: &SqlitePool,
    question_id: i64,
    caller: &AuthUser,
) -> AppResult<()> {
    ensure_author(pool, question_id, caller).await?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM question_votes WHERE question_id = ?")
        .bind(question_id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM questions WHERE question_id = ?")
        .bind(question_id)
        .execute(&mut *tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }
    tx.commit().await?;
    Ok(())
}

/// Guarded upvote: one vote per (question, voter). A repeat vote is a no-op
/// success, so the operation is idempotent.
pub async fn upvote_question(
    pool: &SqlitePool,
    question_id: i64,
    voter_user_id: i64,
) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    let exists = sqlx::query_scalar::<_, i64>("SELECT question_id FROM questions WHERE question_id = ?")
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    let guard = sqlx::query(
        "INSERT OR IGNORE INTO question_votes (question_id, user_id) VALUES (?, ?)",
    )
    .bind(question_id)
    .bind(voter_user_id)
    .execute(&mut *tx)
    .await?;

    if guard.rows_affected() > 0 {
        sqlx::query("UPDATE questions SET upvotes = upvotes + 1 WHERE question_id = ?")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Remove the caller's vote, decrementing with a floor of zero. Removing a
/// vote that was never cast is a no-op success.
pub async fn remove_vote(
    pool: &SqlitePool,
    question_id: i64,
    voter_user_id: i64,
) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    let exists = sqlx::query_scalar::<_, i64>("SELECT question_id FROM questions WHERE question_id = ?")
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    let removed = sqlx::query("DELETE FROM question_votes WHERE question_id = ? AND user_id = ?")
        .bind(question_id)
        .bind(voter_user_id)
        .execute(&mut *tx)
        .await?;

    if removed.rows_affected() > 0 {
        sqlx::query(
            "UPDATE questions SET upvotes = upvotes - 1 WHERE question_id = ? AND upvotes > 0",
        )
        .bind(question_id)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
