//! Account service: registration, login, profiles, and organizer projections.

use sqlx::SqlitePool;

use crate::auth::{password, token};
use crate::models::organizer::OrganizerSummary;
use crate::models::user::{
    LoginRequest, RegisterRequest, UpdateProfileRequest, User, UserProfile, UserSummary,
};
use crate::utils::error::{AppError, AppResult};

/// Result of a successful register or login: a fresh credential plus the
/// caller-facing user summary.
pub struct AuthenticatedUser {
    pub token: String,
    pub user: UserSummary,
}

pub async fn register(
    pool: &SqlitePool,
    jwt_secret: &str,
    req: RegisterRequest,
) -> AppResult<AuthenticatedUser> {
    let first_name = req.first_name.as_deref().map(str::trim).unwrap_or_default();
    let last_name = req.last_name.as_deref().map(str::trim).unwrap_or_default();
    let email = req.email.as_deref().map(str::trim).unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();

    if first_name.is_empty() || last_name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email, password, first name and last name are required".to_string(),
        ));
    }

    let existing = sqlx::query_scalar::<_, i64>("SELECT user_id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "User already exists with this email".to_string(),
        ));
    }

    let (hash, salt) = password::hash_password(password)
        .map_err(|e| AppError::Internal(format!("Error hashing password: {e}")))?;

    let inserted = sqlx::query(
        "INSERT INTO users (first_name, last_name, email, password_hash, salt, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(&hash)
    .bind(&salt)
    .bind(chrono::Utc::now())
    .execute(pool)
    .await?;
    let user_id = inserted.last_insert_rowid();

    // Best effort: the user row is authoritative, a failed organizer profile
    // degrades to a later reverse lookup.
    let organizer_id = match provision_organizer(pool, user_id, first_name, last_name, email).await
    {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(user_id, error = ?e, "organizer provisioning failed");
            None
        }
    };

    let token = token::issue(user_id, email, jwt_secret)
        .map_err(|e| AppError::Internal(format!("Error issuing token: {e}")))?;

    Ok(AuthenticatedUser {
        token,
        user: UserSummary {
            id: user_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            organizer_id,
        },
    })
}

/// Create the organizer profile derived from a new user and backfill the
/// denormalized `users.organizer_id` column, atomically.
async fn provision_organizer(
    pool: &SqlitePool,
    user_id: i64,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let inserted = sqlx::query(
        "INSERT INTO organizers (name, email, user_id, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(format!("{first_name} {last_name}"))
    .bind(email)
    .bind(user_id)
    .bind(chrono::Utc::now())
    .execute(&mut *tx)
    .await?;
    let organizer_id = inserted.last_insert_rowid();

    sqlx::query("UPDATE users SET organizer_id = ? WHERE user_id = ?")
        .bind(organizer_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(organizer_id)
}

pub async fn login(
    pool: &SqlitePool,
    jwt_secret: &str,
    req: LoginRequest,
) -> AppResult<AuthenticatedUser> {
    let email = req.email.as_deref().map(str::trim).unwrap_or_default();
    let password = req.password.as_deref().unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    // One uniform rejection for unknown email and bad password.
    let invalid = || AppError::Auth("Invalid credentials".to_string());

    let user = sqlx::query_as::<_, User>(
        "SELECT user_id, first_name, last_name, email, password_hash, salt, organizer_id, \
         created_at FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(invalid)?;

    let verified = password::verify_password(password, &user.password_hash).unwrap_or(false);
    if !verified {
        return Err(invalid());
    }

    let organizer_id = resolve_organizer_id(pool, user.user_id, user.organizer_id).await?;

    let token = token::issue(user.user_id, &user.email, jwt_secret)
        .map_err(|e| AppError::Internal(format!("Error issuing token: {e}")))?;

    Ok(AuthenticatedUser {
        token,
        user: UserSummary {
            id: user.user_id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            organizer_id,
        },
    })
}

/// Prefer the denormalized column; fall back to a reverse lookup for users
/// whose organizer profile was provisioned out of band.
async fn resolve_organizer_id(
    pool: &SqlitePool,
    user_id: i64,
    denormalized: Option<i64>,
) -> Result<Option<i64>, sqlx::Error> {
    if denormalized.is_some() {
        return Ok(denormalized);
    }
    sqlx::query_scalar::<_, i64>("SELECT organizer_id FROM organizers WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_profile(pool: &SqlitePool, user_id: i64) -> AppResult<UserProfile> {
    let mut profile = sqlx::query_as::<_, UserProfile>(
        "SELECT user_id AS id, first_name, last_name, email, organizer_id, created_at \
         FROM users WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    profile.organizer_id = resolve_organizer_id(pool, user_id, profile.organizer_id).await?;
    Ok(profile)
}

pub async fn update_profile(
    pool: &SqlitePool,
    user_id: i64,
    req: UpdateProfileRequest,
) -> AppResult<()> {
    let first_name = req.first_name.as_deref().map(str::trim).unwrap_or_default();
    let last_name = req.last_name.as_deref().map(str::trim).unwrap_or_default();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(AppError::Validation(
            "First name and last name are required".to_string(),
        ));
    }

    let updated = sqlx::query("UPDATE users SET first_name = ?, last_name = ? WHERE user_id = ?")
        .bind(first_name)
        .bind(last_name)
        .bind(user_id)
        .execute(pool)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(())
}

pub async fn list_users(pool: &SqlitePool) -> AppResult<Vec<UserProfile>> {
    let users = sqlx::query_as::<_, UserProfile>(
        "SELECT user_id AS id, first_name, last_name, email, organizer_id, created_at \
         FROM users ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// All organizers; when none exist yet, every user is presented as an
/// organizer so the event-creation form always has options.
pub async fn list_organizers(pool: &SqlitePool) -> AppResult<Vec<OrganizerSummary>> {
    let organizers = sqlx::query_as::<_, OrganizerSummary>(
        "SELECT organizer_id AS id, name, email, user_id FROM organizers ORDER BY organizer_id",
    )
    .fetch_all(pool)
    .await?;
    if !organizers.is_empty() {
        return Ok(organizers);
    }

    let fallback = sqlx::query_as::<_, OrganizerSummary>(
        "SELECT user_id AS id, first_name || ' ' || last_name AS name, email, user_id \
         FROM users ORDER BY user_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token;
    use crate::services::testutil::{pool, register_user, TEST_SECRET};

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn register_issues_token_for_the_created_user() {
        let pool = pool().await;
        let out = register_user(&pool, "ada@example.com").await;

        let claims = token::verify(&out.token, TEST_SECRET).unwrap();
        assert_eq!(claims.sub, out.user.id);
        assert_eq!(claims.email, "ada@example.com");

        // Same credentials log in afterwards.
        let logged_in = login(&pool, TEST_SECRET, login_req("ada@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(logged_in.user.id, out.user.id);
    }

    #[tokio::test]
    async fn register_creates_an_organizer_profile() {
        let pool = pool().await;
        let out = register_user(&pool, "ada@example.com").await;
        let organizer_id = out.user.organizer_id.expect("organizer provisioned");

        let organizers = list_organizers(&pool).await.unwrap();
        assert_eq!(organizers.len(), 1);
        assert_eq!(organizers[0].id, organizer_id);
        assert_eq!(organizers[0].user_id, out.user.id);
        assert_eq!(organizers[0].name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = pool().await;
        register_user(&pool, "ada@example.com").await;

        let second = register(
            &pool,
            TEST_SECRET,
            RegisterRequest {
                first_name: Some("Ada".into()),
                last_name: Some("Again".into()),
                email: Some("ada@example.com".into()),
                password: Some("other".into()),
            },
        )
        .await;
        assert!(matches!(second, Err(AppError::Conflict(_))));

        // No duplicate row was created.
        let users = list_users(&pool).await.unwrap();
        assert_eq!(users.len(), 1);
    }

    #[tokio::test]
    async fn register_rejects_missing_fields() {
        let pool = pool().await;
        let out = register(
            &pool,
            TEST_SECRET,
            RegisterRequest {
                first_name: Some("Ada".into()),
                last_name: None,
                email: Some("ada@example.com".into()),
                password: Some("pw".into()),
            },
        )
        .await;
        assert!(matches!(out, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn login_rejects_unknown_email_and_bad_password_uniformly() {
        let pool = pool().await;
        register_user(&pool, "ada@example.com").await;

        let unknown = login(&pool, TEST_SECRET, login_req("ghost@example.com", "pw")).await;
        let bad_pw = login(&pool, TEST_SECRET, login_req("ada@example.com", "wrong")).await;

        let msg = |r: Result<AuthenticatedUser, AppError>| match r {
            Err(AppError::Auth(m)) => m,
            other => panic!("expected auth error, got {:?}", other.err()),
        };
        assert_eq!(msg(unknown), msg(bad_pw));
    }

    #[tokio::test]
    async fn login_falls_back_to_reverse_organizer_lookup() {
        let pool = pool().await;
        let out = register_user(&pool, "ada@example.com").await;
        let organizer_id = out.user.organizer_id.unwrap();

        // Simulate a user row without the denormalized link.
        sqlx::query("UPDATE users SET organizer_id = NULL WHERE user_id = ?")
            .bind(out.user.id)
            .execute(&pool)
            .await
            .unwrap();

        let logged_in = login(&pool, TEST_SECRET, login_req("ada@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(logged_in.user.organizer_id, Some(organizer_id));
    }

    #[tokio::test]
    async fn profile_roundtrip_and_not_found() {
        let pool = pool().await;
        let out = register_user(&pool, "ada@example.com").await;

        let profile = get_profile(&pool, out.user.id).await.unwrap();
        assert_eq!(profile.email, "ada@example.com");

        update_profile(
            &pool,
            out.user.id,
            UpdateProfileRequest {
                first_name: Some("Grace".into()),
                last_name: Some("Hopper".into()),
            },
        )
        .await
        .unwrap();
        let profile = get_profile(&pool, out.user.id).await.unwrap();
        assert_eq!(profile.first_name, "Grace");

        assert!(matches!(
            get_profile(&pool, 9999).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            update_profile(
                &pool,
                9999,
                UpdateProfileRequest {
                    first_name: Some("A".into()),
                    last_name: Some("B".into()),
                }
            )
            .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn organizer_listing_falls_back_to_users_when_empty() {
        let pool = pool().await;
        let out = register_user(&pool, "ada@example.com").await;

        // Wipe organizer rows to exercise the fallback.
        sqlx::query("UPDATE users SET organizer_id = NULL")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("DELETE FROM organizers")
            .execute(&pool)
            .await
            .unwrap();

        let organizers = list_organizers(&pool).await.unwrap();
        assert_eq!(organizers.len(), 1);
        assert_eq!(organizers[0].id, out.user.id);
        assert_eq!(organizers[0].user_id, out.user.id);
    }
}
