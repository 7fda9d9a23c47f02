use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::models::event::{CreateEventRequest, EventDetail, UpdateEventRequest};
use crate::services::event;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, data, message, ApiResponse};

pub async fn list_events(State(state): State<AppState>) -> AppResult<Response> {
    let events = event::list_events(&state.pool).await?;
    Ok(data(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<Response> {
    let event = event::create_event(&state.pool, req).await?;
    Ok(created(event, "Event created successfully"))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> AppResult<Response> {
    let event = event::get_event(&state.pool, event_id).await?;
    Ok(data(event))
}

pub async fn update_event(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> AppResult<Response> {
    let event = event::update_event(&state.pool, event_id, &caller, req).await?;
    let body = ApiResponse {
        status: "success",
        message: Some("Event updated successfully".to_string()),
        data: Some(event),
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

pub async fn delete_event(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(event_id): Path<i64>,
) -> AppResult<Response> {
    event::delete_event(&state.pool, event_id, &caller).await?;
    Ok(message("Event deleted successfully"))
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub category_id: Option<i64>,
}

pub async fn search_events(
    State(state): State<AppState>,
    Path(query): Path<String>,
    Query(params): Query<SearchParams>,
) -> AppResult<Response> {
    let events = event::search_events(&state.pool, &query, params.category_id).await?;
    Ok(data(events))
}

#[derive(Serialize)]
struct OrganizerEvents {
    status: &'static str,
    data: Vec<EventDetail>,
    count: usize,
}

pub async fn list_events_by_organizer(
    State(state): State<AppState>,
    Path(organizer_id): Path<i64>,
) -> AppResult<Response> {
    let events = event::list_events_by_organizer(&state.pool, organizer_id).await?;
    let body = OrganizerEvents {
        status: "success",
        count: events.len(),
        data: events,
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}
