use axum::extract::State;
use axum::response::Response;
use axum::Json;

use crate::models::category::CreateCategoryRequest;
use crate::services::category;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::{created, data};

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Response> {
    let categories = category::list_categories(&state.pool).await?;
    Ok(data(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> AppResult<Response> {
    let category = category::create_category(&state.pool, req).await?;
    Ok(created(category, "Category created successfully"))
}
