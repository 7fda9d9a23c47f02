use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::response::data;

pub mod categories;
pub mod events;
pub mod questions;
pub mod users;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    data(HealthPayload {
        status: "ok",
        service: "eventitude-api",
    })
    .into_response()
}
