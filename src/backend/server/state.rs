//! Application State Management
//!
//! This module defines the application state structure and implements the
//! `FromRef` traits for Axum state extraction.
//!
//! # Architecture
//!
//! The `AppState` struct is the central state container: the database pool,
//! parsed configuration, and the third-party adapter clients. There is no
//! in-process shared mutable state — every handler works against the pool.
//!
//! # State Extraction
//!
//! The `FromRef` implementations allow handlers to extract just the part of
//! the state they use (`State<PgPool>`, `State<PaymentClient>`, ...)
//! without taking the whole `AppState`.

use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::adapters::{GeocodeClient, Mailer, MediaClient, PaymentClient};
use crate::backend::server::config::AppConfig;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub db_pool: PgPool,

    /// Parsed environment configuration
    pub config: Arc<AppConfig>,

    /// Payment-processor client (checkout sessions)
    pub payments: PaymentClient,

    /// Media-hosting client (image/video/audio uploads)
    pub media: MediaClient,

    /// Geocoding client (event locations)
    pub geocoder: GeocodeClient,

    /// Outbound mailer, `None` when SMTP is unconfigured
    pub mailer: Option<Mailer>,
}

impl AppState {
    /// Assemble state from configuration and an open pool
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let payments = PaymentClient::new(config.payments.clone());
        let media = MediaClient::new(config.media.clone());
        let geocoder = GeocodeClient::new(config.geocode_url.clone());
        let mailer = Mailer::from_config(config.mail.as_ref());

        Self {
            db_pool,
            config: Arc::new(config),
            payments,
            media,
            geocoder,
            mailer,
        }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for PaymentClient {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.payments.clone()
    }
}

impl FromRef<AppState> for MediaClient {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.media.clone()
    }
}

impl FromRef<AppState> for GeocodeClient {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.geocoder.clone()
    }
}

impl FromRef<AppState> for Option<Mailer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.mailer.clone()
    }
}
