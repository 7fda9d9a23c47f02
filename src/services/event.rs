//! Event service: CRUD, search, and ownership checks.
//!
//! Multi-step writes (insert + category linking, the delete cascade) run in a
//! single transaction so an event can never be left with partial links.

use sqlx::SqlitePool;

use crate::auth::AuthUser;
use crate::models::event::{CreateEventRequest, EventDetail, EventRow, UpdateEventRequest};
use crate::profanity;
use crate::services::category;
use crate::utils::error::{AppError, AppResult};

const EVENT_SELECT: &str = "SELECT e.event_id, e.title, e.description, e.date, e.location, \
     e.organizer_id, o.name AS organizer_name, e.created_at \
     FROM events e JOIN organizers o ON o.organizer_id = e.organizer_id";

fn content_policy_gate(title: &str, description: Option<&str>) -> AppResult<()> {
    if profanity::contains_profanity(title)
        || description.is_some_and(profanity::contains_profanity)
    {
        return Err(AppError::ContentPolicy(
            "Content contains inappropriate language".to_string(),
        ));
    }
    Ok(())
}

async fn hydrate(pool: &SqlitePool, rows: Vec<EventRow>) -> AppResult<Vec<EventDetail>> {
    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        let categories = category::event_categories(pool, row.event_id).await?;
        events.push(EventDetail::from_row(row, categories));
    }
    Ok(events)
}

pub async fn create_event(pool: &SqlitePool, req: CreateEventRequest) -> AppResult<EventDetail> {
    let title = req.title.as_deref().map(str::trim).unwrap_or_default();
    let date = req.date.as_deref().map(str::trim).unwrap_or_default();
    let Some(organizer_id) = req.organizer_id else {
        return Err(AppError::Validation(
            "Title, date and organizer_id are required".to_string(),
        ));
    };
    if title.is_empty() || date.is_empty() {
        return Err(AppError::Validation(
            "Title, date and organizer_id are required".to_string(),
        ));
    }
    content_policy_gate(title, req.description.as_deref())?;

    let organizer_exists =
        sqlx::query_scalar::<_, i64>("SELECT organizer_id FROM organizers WHERE organizer_id = ?")
            .bind(organizer_id)
            .fetch_optional(pool)
            .await?;
    if organizer_exists.is_none() {
        return Err(AppError::Validation(
            "Organizer does not exist".to_string(),
        ));
    }

    let category_ids = req.category_ids.unwrap_or_default();

    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        "INSERT INTO events (title, description, date, location, organizer_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(&req.description)
    .bind(date)
    .bind(&req.location)
    .bind(organizer_id)
    .bind(chrono::Utc::now())
    .execute(&mut *tx)
    .await?;
    let event_id = inserted.last_insert_rowid();
    category::replace_links(&mut tx, event_id, &category_ids).await?;
    tx.commit().await?;

    get_event(pool, event_id).await
}

pub async fn get_event(pool: &SqlitePool, event_id: i64) -> AppResult<EventDetail> {
    let row = sqlx::query_as::<_, EventRow>(&format!("{EVENT_SELECT} WHERE e.event_id = ?"))
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let categories = category::event_categories(pool, event_id).await?;
    Ok(EventDetail::from_row(row, categories))
}

pub async fn list_events(pool: &SqlitePool) -> AppResult<Vec<EventDetail>> {
    let rows = sqlx::query_as::<_, EventRow>(&format!("{EVENT_SELECT} ORDER BY e.created_at DESC"))
        .fetch_all(pool)
        .await?;
    hydrate(pool, rows).await
}

/// Case-insensitive substring search over title and description, optionally
/// restricted to events linked to a category.
pub async fn search_events(
    pool: &SqlitePool,
    query: &str,
    category_id: Option<i64>,
) -> AppResult<Vec<EventDetail>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation(
            "Search query is required".to_string(),
        ));
    }
    let pattern = format!("%{query}%");

    let rows = match category_id {
        Some(category_id) => {
            sqlx::query_as::<_, EventRow>(&format!(
                "{EVENT_SELECT} WHERE (e.title LIKE ? OR e.description LIKE ?) \
                 AND EXISTS (SELECT 1 FROM event_categories ec \
                     WHERE ec.event_id = e.event_id AND ec.category_id = ?) \
                 ORDER BY e.created_at DESC"
            ))
            .bind(&pattern)
            .bind(&pattern)
            .bind(category_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, EventRow>(&format!(
                "{EVENT_SELECT} WHERE (e.title LIKE ? OR e.description LIKE ?) \
                 ORDER BY e.created_at DESC"
            ))
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(pool)
            .await?
        }
    };
    hydrate(pool, rows).await
}

pub async fn list_events_by_organizer(
    pool: &SqlitePool,
    organizer_id: i64,
) -> AppResult<Vec<EventDetail>> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "{EVENT_SELECT} WHERE e.organizer_id = ? ORDER BY e.created_at DESC"
    ))
    .bind(organizer_id)
    .fetch_all(pool)
    .await?;
    hydrate(pool, rows).await
}

/// The caller must be the user behind the event's organizer.
async fn ensure_owner(pool: &SqlitePool, event_id: i64, caller: &AuthUser) -> AppResult<()> {
    let owner = sqlx::query_scalar::<_, i64>(
        "SELECT o.user_id FROM events e \
         JOIN organizers o ON o.organizer_id = e.organizer_id \
         WHERE e.event_id = ?",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    if owner != caller.user_id {
        return Err(AppError::Forbidden(
            "Only the event organizer can modify this event".to_string(),
        ));
    }
    Ok(())
}

pub async fn update_event(
    pool: &SqlitePool,
    event_id: i64,
    caller: &AuthUser,
    req: UpdateEventRequest,
) -> AppResult<EventDetail> {
    ensure_owner(pool, event_id, caller).await?;

    let title = req.title.as_deref().map(str::trim).unwrap_or_default();
    let date = req.date.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() || date.is_empty() {
        return Err(AppError::Validation(
            "Title and date are required".to_string(),
        ));
    }
    content_policy_gate(title, req.description.as_deref())?;

    let category_ids = req.category_ids.unwrap_or_default();

    let mut tx = pool.begin().await?;
    let updated = sqlx::query(
        "UPDATE events SET title = ?, description = ?, date = ?, location = ? WHERE event_id = ?",
    )
    .bind(title)
    .bind(&req.description)
    .bind(date)
    .bind(&req.location)
    .bind(event_id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    category::replace_links(&mut tx, event_id, &category_ids).await?;
    tx.commit().await?;

    get_event(pool, event_id).await
}

/// Hard delete: questions (and their votes), category links, then the event,
/// in that order to respect referential integrity.
pub async fn delete_event(pool: &SqlitePool, event_id: i64, caller: &AuthUser) -> AppResult<()> {
    ensure_owner(pool, event_id, caller).await?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        "DELETE FROM question_votes WHERE question_id IN \
         (SELECT question_id FROM questions WHERE event_id = ?)",
    )
    .bind(event_id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM questions WHERE event_id = ?")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM event_categories WHERE event_id = ?")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM events WHERE event_id = ?")
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    if deleted.rows_affected() == 0 {
        return Err(AppError::NotFound("Event not found".to_string()));
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::CreateQuestionRequest;
    use crate::services::category::{create_category, event_categories};
    use crate::services::testutil::{create_event, pool, register_user};
    use crate::services::question;

    async fn organizer(pool: &SqlitePool, email: &str) -> (AuthUser, i64) {
        let out = register_user(pool, email).await;
        (
            AuthUser {
                user_id: out.user.id,
                email: out.user.email.clone(),
            },
            out.user.organizer_id.unwrap(),
        )
    }

    fn category_req(name: &str) -> crate::models::category::CreateCategoryRequest {
        crate::models::category::CreateCategoryRequest {
            name: Some(name.into()),
            description: None,
        }
    }

    #[tokio::test]
    async fn created_event_is_hydrated_with_its_categories() {
        let pool = pool().await;
        let (_, organizer_id) = organizer(&pool, "ada@example.com").await;
        let music = create_category(&pool, category_req("Music")).await.unwrap();

        let event = create_event(&pool, "Gig", organizer_id, vec![music.id]).await;
        assert_eq!(event.title, "Gig");
        assert_eq!(event.organizer_name, "Ada Lovelace");
        assert_eq!(event.categories.len(), 1);
        assert_eq!(event.categories[0].name, "Music");

        let fetched = get_event(&pool, event.id).await.unwrap();
        let ids: Vec<_> = fetched.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![music.id]);
    }

    #[tokio::test]
    async fn create_validates_required_fields_and_organizer() {
        let pool = pool().await;
        let missing = create_event_req(None, Some("2025-01-01"), Some(1));
        assert!(matches!(
            super::create_event(&pool, missing).await,
            Err(AppError::Validation(_))
        ));

        let unknown_organizer =
            create_event_req(Some("Gig"), Some("2025-01-01"), Some(4242));
        assert!(matches!(
            super::create_event(&pool, unknown_organizer).await,
            Err(AppError::Validation(_))
        ));
    }

    fn create_event_req(
        title: Option<&str>,
        date: Option<&str>,
        organizer_id: Option<i64>,
    ) -> CreateEventRequest {
        CreateEventRequest {
            title: title.map(Into::into),
            description: None,
            date: date.map(Into::into),
            location: None,
            organizer_id,
            category_ids: None,
        }
    }

    #[tokio::test]
    async fn profane_titles_are_rejected() {
        let pool = pool().await;
        let (_, organizer_id) = organizer(&pool, "ada@example.com").await;

        let req = create_event_req(Some("stupid event"), Some("2025-01-01"), Some(organizer_id));
        assert!(matches!(
            super::create_event(&pool, req).await,
            Err(AppError::ContentPolicy(_))
        ));
    }

    #[tokio::test]
    async fn search_matches_substring_and_category_filter() {
        let pool = pool().await;
        let (_, organizer_id) = organizer(&pool, "ada@example.com").await;
        let music = create_category(&pool, category_req("Music")).await.unwrap();
        let gig = create_event(&pool, "Gig", organizer_id, vec![music.id]).await;
        create_event(&pool, "Conference", organizer_id, vec![]).await;

        let hits = search_events(&pool, "gig", None).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, gig.id);

        let hits = search_events(&pool, "e", Some(music.id)).await.unwrap();
        assert_eq!(hits.len(), 1, "category filter intersects the match set");

        assert!(matches!(
            search_events(&pool, "   ", None).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_replaces_category_links_wholesale() {
        let pool = pool().await;
        let (caller, organizer_id) = organizer(&pool, "ada@example.com").await;
        let music = create_category(&pool, category_req("Music")).await.unwrap();
        let film = create_category(&pool, category_req("Film")).await.unwrap();
        let event = create_event(&pool, "Gig", organizer_id, vec![music.id]).await;

        let updated = update_event(
            &pool,
            event.id,
            &caller,
            UpdateEventRequest {
                title: Some("Gig v2".into()),
                description: Some("updated".into()),
                date: Some("2025-02-01".into()),
                location: None,
                category_ids: Some(vec![film.id]),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Gig v2");
        let ids: Vec<_> = updated.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![film.id]);
    }

    #[tokio::test]
    async fn update_and_delete_require_ownership() {
        let pool = pool().await;
        let (_, organizer_id) = organizer(&pool, "ada@example.com").await;
        let (intruder, _) = organizer(&pool, "mallory@example.com").await;
        let event = create_event(&pool, "Gig", organizer_id, vec![]).await;

        let update = update_event(
            &pool,
            event.id,
            &intruder,
            UpdateEventRequest {
                title: Some("Hijacked".into()),
                description: None,
                date: Some("2025-01-01".into()),
                location: None,
                category_ids: None,
            },
        )
        .await;
        assert!(matches!(update, Err(AppError::Forbidden(_))));
        assert!(matches!(
            delete_event(&pool, event.id, &intruder).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn delete_cascades_to_questions_and_links() {
        let pool = pool().await;
        let (caller, organizer_id) = organizer(&pool, "ada@example.com").await;
        let music = create_category(&pool, category_req("Music")).await.unwrap();
        let event = create_event(&pool, "Gig", organizer_id, vec![music.id]).await;

        let question = question::create_question(
            &pool,
            event.id,
            CreateQuestionRequest {
                content: Some("When are doors?".into()),
                user_id: Some(caller.user_id),
            },
        )
        .await
        .unwrap();
        question::upvote_question(&pool, question.id, caller.user_id)
            .await
            .unwrap();

        delete_event(&pool, event.id, &caller).await.unwrap();

        assert!(matches!(
            get_event(&pool, event.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(question::list_questions(&pool, event.id)
            .await
            .unwrap()
            .is_empty());
        assert!(event_categories(&pool, event.id).await.unwrap().is_empty());

        assert!(matches!(
            delete_event(&pool, event.id, &caller).await,
            Err(AppError::NotFound(_))
        ));
    }
}
