//! Typed domain events and their notification/audit fan-out
//!
//! See [`events::DomainEvent`] for the event catalogue and
//! [`consumer::plan`] for the mapping rules.

pub mod consumer;
pub mod events;

use sqlx::PgPool;

pub use consumer::{AuditDraft, EffectPlan, NotificationDraft, NotificationRemoval};
pub use events::DomainEvent;

/// Plan and apply one event's side effects
///
/// Failures here are logged and swallowed: a lost notification must not
/// fail the state change that triggered it.
pub async fn dispatch(pool: &PgPool, event: DomainEvent) {
    let plan = consumer::plan(&event);
    if let Err(e) = consumer::apply(pool, &plan).await {
        tracing::error!("Failed to apply side effects for {:?}: {:?}", event, e);
    }
}
