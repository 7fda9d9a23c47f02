use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::models::user::{LoginRequest, RegisterRequest, UpdateProfileRequest, UserSummary};
use crate::services::account;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{data, message};

/// Envelope for register/login: the credential travels beside the summary.
#[derive(Serialize)]
struct AuthResponse {
    status: &'static str,
    message: &'static str,
    token: String,
    user: UserSummary,
}

fn auth_response(
    status: StatusCode,
    msg: &'static str,
    out: account::AuthenticatedUser,
) -> Response {
    let body = AuthResponse {
        status: "success",
        message: msg,
        token: out.token,
        user: out.user,
    };
    (status, Json(body)).into_response()
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Response> {
    let out = account::register(&state.pool, &state.config.jwt_secret, req).await?;
    Ok(auth_response(
        StatusCode::CREATED,
        "User registered successfully",
        out,
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Response> {
    let out = account::login(&state.pool, &state.config.jwt_secret, req).await?;
    Ok(auth_response(StatusCode::OK, "Login successful", out))
}

/// No server-side session exists; logout is a stateless acknowledgement.
pub async fn logout() -> Response {
    message("Logout successful")
}

pub async fn get_profile(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(user_id): Path<i64>,
) -> AppResult<Response> {
    let profile = account::get_profile(&state.pool, user_id).await?;
    Ok(data(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<Response> {
    if caller.user_id != user_id {
        return Err(AppError::Forbidden(
            "You can only update your own profile".to_string(),
        ));
    }
    account::update_profile(&state.pool, user_id, req).await?;
    Ok(message("Profile updated successfully"))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Response> {
    let users = account::list_users(&state.pool).await?;
    Ok(data(users))
}

pub async fn list_organizers(State(state): State<AppState>) -> AppResult<Response> {
    let organizers = account::list_organizers(&state.pool).await?;
    Ok(data(organizers))
}
