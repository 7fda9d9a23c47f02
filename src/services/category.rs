//! Category service: CRUD plus the many-to-many linking used by events.

use sqlx::{SqliteConnection, SqlitePool};

use crate::models::category::{Category, CreateCategoryRequest};
use crate::utils::error::{AppError, AppResult};

pub async fn list_categories(pool: &SqlitePool) -> AppResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT category_id AS id, name, description FROM categories ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn create_category(
    pool: &SqlitePool,
    req: CreateCategoryRequest,
) -> AppResult<Category> {
    let name = req.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::Validation(
            "Category name is required".to_string(),
        ));
    }

    let inserted = sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
        .bind(name)
        .bind(&req.description)
        .execute(pool)
        .await;

    match inserted {
        Ok(result) => Ok(Category {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            description: req.description,
        }),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(AppError::Conflict(
            "Category name already exists".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Replace an event's category links with the given set, atomically.
///
/// An empty set clears all links. Unknown category ids are silently ignored:
/// the insert is guarded by a `SELECT` against the categories table.
pub async fn replace_event_categories(
    pool: &SqlitePool,
    event_id: i64,
    category_ids: &[i64],
) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    replace_links(&mut tx, event_id, category_ids).await?;
    tx.commit().await?;
    Ok(())
}

/// Transaction-scoped link replacement, shared with the event service so
/// create/update can link categories inside their own transactions.
pub(crate) async fn replace_links(
    conn: &mut SqliteConnection,
    event_id: i64,
    category_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM event_categories WHERE event_id = ?")
        .bind(event_id)
        .execute(&mut *conn)
        .await?;

    for &category_id in category_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO event_categories (event_id, category_id) \
             SELECT ?, category_id FROM categories WHERE category_id = ?",
        )
        .bind(event_id)
        .bind(category_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// The resolved category list for one event, ordered by name.
pub async fn event_categories(pool: &SqlitePool, event_id: i64) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT c.category_id AS id, c.name, c.description \
         FROM categories c \
         JOIN event_categories ec ON ec.category_id = c.category_id \
         WHERE ec.event_id = ? \
         ORDER BY c.name",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await
}
