use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::category::Category;

/// Event row joined with its organizer's display name.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub event_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub location: Option<String>,
    pub organizer_id: i64,
    pub organizer_name: String,
    pub created_at: DateTime<Utc>,
}

/// Hydrated event: the row enriched with its resolved category list.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: String,
    pub location: Option<String>,
    pub organizer_id: i64,
    pub organizer_name: String,
    pub created_at: DateTime<Utc>,
    pub categories: Vec<Category>,
}

impl EventDetail {
    pub fn from_row(row: EventRow, categories: Vec<Category>) -> Self {
        Self {
            id: row.event_id,
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            organizer_id: row.organizer_id,
            organizer_name: row.organizer_name,
            created_at: row.created_at,
            categories,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub organizer_id: Option<i64>,
    pub category_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub category_ids: Option<Vec<i64>>,
}
