use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Success envelope: `{status:"success", message?, data?}`.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize)]
struct ApiErrorResponse {
    status: &'static str,
    message: String,
}

pub fn data<T>(data: T) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        status: "success",
        message: None,
        data: Some(data),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn created<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        status: "success",
        message: Some(message.into()),
        data: Some(data),
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

pub fn message(message: impl Into<String>) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        status: "success",
        message: Some(message.into()),
        data: None,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn error(message: impl Into<String>, status: StatusCode) -> Response {
    let body = ApiErrorResponse {
        status: "error",
        message: message.into(),
    };
    (status, Json(body)).into_response()
}
