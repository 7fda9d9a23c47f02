use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::auth::AuthUser;
use crate::models::question::{CreateQuestionRequest, UpdateQuestionRequest};
use crate::services::question;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, data, message};

pub async fn list_questions(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> AppResult<Response> {
    let questions = question::list_questions(&state.pool, event_id).await?;
    Ok(data(questions))
}

pub async fn create_question(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<CreateQuestionRequest>,
) -> AppResult<Response> {
    let question = question::create_question(&state.pool, event_id, req).await?;
    Ok(created(question, "Question created successfully"))
}

pub async fn update_question(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(question_id): Path<i64>,
    Json(req): Json<UpdateQuestionRequest>,
) -> AppResult<Response> {
    question::update_question(&state.pool, question_id, &caller, req.content).await?;
    Ok(message("Question updated successfully"))
}

pub async fn delete_question(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(question_id): Path<i64>,
) -> AppResult<Response> {
    question::delete_question(&state.pool, question_id, &caller).await?;
    Ok(message("Question deleted successfully"))
}

pub async fn upvote_question(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(question_id): Path<i64>,
) -> AppResult<Response> {
    question::upvote_question(&state.pool, question_id, caller.user_id).await?;
    Ok(message("Question upvoted successfully"))
}

pub async fn remove_vote(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(question_id): Path<i64>,
) -> AppResult<Response> {
    question::remove_vote(&state.pool, question_id, caller.user_id).await?;
    Ok(message("Vote removed successfully"))
}
