//! Authentication helpers for integration tests

use sqlx::PgPool;
use uuid::Uuid;

use artcorner::backend::auth::sessions::create_token;
use artcorner::backend::auth::users::{create_user, User};
use artcorner::backend::server::config::AppConfig;
use artcorner::backend::server::create_app;
use axum_test::TestServer;

/// A created test user with a ready-to-use session token
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    /// `Cookie` header value carrying the session
    pub fn cookie(&self) -> String {
        format!("jwt={}", self.token)
    }
}

/// Create a user directly in the database and mint a session token
pub async fn create_test_user(pool: &PgPool, username: &str) -> TestUser {
    let email = format!("{username}@example.com");
    let password_hash = bcrypt::hash("password123", bcrypt::DEFAULT_COST).unwrap();
    let user = create_user(pool, username.to_string(), email, password_hash)
        .await
        .expect("Failed to create test user");
    let token = create_token(user.id, user.email.clone()).expect("Failed to create token");
    TestUser { user, token }
}

/// Promote a test user to admin
pub async fn make_admin(pool: &PgPool, user_id: Uuid) {
    artcorner::backend::auth::users::set_admin_role(pool, user_id)
        .await
        .expect("Failed to grant admin role");
}

/// Minimal config pointing at the test database; no third-party services
pub fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        database_url,
        port: 0,
        payments: None,
        media: None,
        mail: None,
        geocode_url: None,
        admin_bootstrap: None,
    }
}

/// Spin up the full application against the test database
pub async fn create_test_server(database_url: String) -> TestServer {
    let app = create_app(test_config(database_url))
        .await
        .expect("Failed to create app");
    TestServer::new(app).unwrap()
}
