//! Admin Provisioning
//!
//! Admin accounts are never created through signup. At startup, when
//! `ADMIN_EMAIL`/`ADMIN_PASSWORD` are configured, this module creates the
//! account (or promotes an existing one) and writes an audit record. With
//! no bootstrap configuration, the instance simply has no admin.

use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::audit;
use crate::backend::auth::users::{create_user, get_user_by_email, set_admin_role};
use crate::backend::server::config::AdminBootstrap;
use crate::shared::ResourceKind;

/// Ensure the configured admin account exists and carries the admin role
pub async fn provision_admin(
    pool: &PgPool,
    bootstrap: &AdminBootstrap,
) -> Result<(), sqlx::Error> {
    let user = match get_user_by_email(pool, &bootstrap.email).await? {
        Some(existing) => {
            if existing.is_admin() {
                tracing::debug!("Admin account {} already provisioned", existing.email);
                return Ok(());
            }
            tracing::info!("Promoting existing account {} to admin", existing.email);
            existing
        }
        None => {
            let password_hash = match hash(&bootstrap.password, DEFAULT_COST) {
                Ok(h) => h,
                Err(e) => {
                    tracing::error!("Failed to hash bootstrap admin password: {:?}", e);
                    return Ok(());
                }
            };
            tracing::info!("Creating bootstrap admin account {}", bootstrap.email);
            create_user(
                pool,
                bootstrap.username.clone(),
                bootstrap.email.clone(),
                password_hash,
            )
            .await?
        }
    };

    set_admin_role(pool, user.id).await?;

    audit::db::record(
        pool,
        "admin.bootstrap",
        None,
        Some(ResourceKind::User),
        Some(user.id),
        format!("granted admin role to {}", user.email),
    )
    .await?;

    Ok(())
}
