//! User Model and Database Operations
//!
//! This module handles user data and database operations. `users` is the
//! only entity with an optimistic concurrency counter: profile updates must
//! present the version they read, and a stale version fails the save with
//! no rows updated (callers map that to a conflict and retry).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User email address
    pub email: String,
    /// Hashed password (bcrypt)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name shown on the profile
    pub display_name: Option<String>,
    /// Profile bio
    pub bio: Option<String>,
    /// Avatar image URL (hosted on the media CDN)
    pub avatar_url: Option<String>,
    /// Account role, "user" or "admin"
    pub role: String,
    /// Blocked accounts keep their session cookie but every protected
    /// route rejects them
    pub is_blocked: bool,
    /// Optimistic concurrency counter
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin.as_str()
    }
}

/// Profile fields a user may edit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, display_name, bio, avatar_url, role, is_blocked, version, created_at, updated_at";

/// Create a new user with the "user" role
pub async fn create_user(
    pool: &PgPool,
    username: String,
    email: String,
    password_hash: String,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, username, email, password_hash, role, is_blocked, version, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 'user', FALSE, 0, $5, $6)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List all users, newest first (admin view)
pub async fn list_users(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Apply a profile update against the version the caller read
///
/// Returns `Ok(None)` when the version is stale (a concurrent update won);
/// the caller should surface a conflict and retry with fresh data.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    expected_version: i64,
    update: &ProfileUpdate,
) -> Result<Option<User>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET display_name = COALESCE($1, display_name),
            bio = COALESCE($2, bio),
            avatar_url = COALESCE($3, avatar_url),
            version = version + 1,
            updated_at = $4
        WHERE id = $5 AND version = $6
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&update.display_name)
    .bind(&update.bio)
    .bind(&update.avatar_url)
    .bind(now)
    .bind(user_id)
    .bind(expected_version)
    .fetch_optional(pool)
    .await
}

/// Set or clear the blocked flag
pub async fn set_blocked(pool: &PgPool, user_id: Uuid, blocked: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET is_blocked = $1, updated_at = $2 WHERE id = $3")
        .bind(blocked)
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Grant the admin role (bootstrap only)
pub async fn set_admin_role(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET role = 'admin', updated_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Hard-delete a user
///
/// Owned rows (products, galleries, comments, orders, ...) go with the user
/// through foreign-key cascades; audit rows survive with `performed_by`
/// nulled.
pub async fn delete_user(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Add `blocked_user_id` to `user_id`'s personal block list
pub async fn block_user(
    pool: &PgPool,
    user_id: Uuid,
    blocked_user_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO user_blocks (user_id, blocked_user_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(blocked_user_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove `blocked_user_id` from `user_id`'s personal block list
pub async fn unblock_user(
    pool: &PgPool,
    user_id: Uuid,
    blocked_user_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM user_blocks WHERE user_id = $1 AND blocked_user_id = $2")
        .bind(user_id)
        .bind(blocked_user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Whether either user has the other on their personal block list
pub async fn is_blocked_between(
    pool: &PgPool,
    a: Uuid,
    b: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM user_blocks
        WHERE (user_id = $1 AND blocked_user_id = $2)
           OR (user_id = $2 AND blocked_user_id = $1)
        "#,
    )
    .bind(a)
    .bind(b)
    .fetch_one(pool)
    .await?;
    Ok(row.0 > 0)
}
