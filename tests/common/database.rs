//! Database test fixtures and utilities
//!
//! Integration tests need a running PostgreSQL instance. When
//! `DATABASE_URL` is not set the fixtures return `None` and tests skip
//! themselves instead of failing.

use sqlx::PgPool;

/// Test database fixture
///
/// Connects, runs migrations, and truncates all tables so every test
/// starts from a clean slate. Combine with `#[serial]` — tests share one
/// database.
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    /// Create the fixture, or `None` when `DATABASE_URL` is unset or
    /// unreachable
    pub async fn try_new() -> Option<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => {
                eprintln!("skipping: DATABASE_URL not set");
                return None;
            }
        };

        let pool = match PgPool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                eprintln!("skipping: cannot connect to test database: {e}");
                return None;
            }
        };

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let db = Self { pool };
        db.truncate_all().await.expect("Failed to clean test data");
        Some(db)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn url(&self) -> String {
        std::env::var("DATABASE_URL").expect("DATABASE_URL was present in try_new")
    }

    /// Remove all data while preserving the schema
    pub async fn truncate_all(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "TRUNCATE TABLE users, user_blocks, favorites, cart_items, products, galleries, \
             gallery_collaborators, gallery_products, events, event_participants, articles, \
             comments, comment_reactions, messages, notifications, orders, order_items, \
             reviews, reports, audit_logs CASCADE",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
