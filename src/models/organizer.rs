use serde::Serialize;
use sqlx::FromRow;

/// Organizer projection for the event-creation form.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrganizerSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub user_id: i64,
}
