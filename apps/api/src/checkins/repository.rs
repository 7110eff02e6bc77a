use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::checkins::validation::ValidCheckIn;
use crate::models::checkin::CheckIn;
use crate::models::user::User;

/// Looks up a user by exact name.
pub async fn find_user_by_name(pool: &PgPool, name: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, name, created_at FROM users WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}

/// Returns the user called `name`, creating it on first use.
/// Concurrent first submissions for one name resolve to the same row.
pub async fn get_or_create_user(pool: &PgPool, name: &str) -> Result<User, sqlx::Error> {
    if let Some(user) = find_user_by_name(pool, name).await? {
        return Ok(user);
    }

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?;

    info!("Created user {} ({})", user.name, user.id);
    Ok(user)
}

/// Inserts a check-in for `user`. Check-ins are never updated afterwards.
pub async fn insert_check_in(
    pool: &PgPool,
    user: &User,
    check_in: &ValidCheckIn,
) -> Result<CheckIn, sqlx::Error> {
    sqlx::query_as::<_, CheckIn>(
        r#"
        INSERT INTO check_ins
            (id, user_id, user_name, mood, stress_level, productivity_level, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, created_at, user_id, user_name, mood, stress_level, productivity_level, notes
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.id)
    .bind(&user.name)
    .bind(check_in.mood.as_str())
    .bind(check_in.stress_level)
    .bind(check_in.productivity_level)
    .bind(&check_in.notes)
    .fetch_one(pool)
    .await
}

/// Lists check-ins oldest first, optionally restricted to one user name.
pub async fn list_check_ins(
    pool: &PgPool,
    user_name: Option<&str>,
) -> Result<Vec<CheckIn>, sqlx::Error> {
    sqlx::query_as::<_, CheckIn>(
        r#"
        SELECT id, created_at, user_id, user_name, mood, stress_level, productivity_level, notes
        FROM check_ins
        WHERE $1::text IS NULL OR user_name = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(user_name)
    .fetch_all(pool)
    .await
}

/// Lists the `limit` most recent check-ins, newest first, optionally restricted to
/// one user name.
pub async fn list_recent_check_ins(
    pool: &PgPool,
    user_name: Option<&str>,
    limit: i64,
) -> Result<Vec<CheckIn>, sqlx::Error> {
    sqlx::query_as::<_, CheckIn>(
        r#"
        SELECT id, created_at, user_id, user_name, mood, stress_level, productivity_level, notes
        FROM check_ins
        WHERE $1::text IS NULL OR user_name = $1
        ORDER BY created_at DESC, id DESC
        LIMIT $2
        "#,
    )
    .bind(user_name)
    .bind(limit)
    .fetch_all(pool)
    .await
}
