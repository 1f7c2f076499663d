//! API Route Handlers
//!
//! This module wires every `/api/*` route group to its handler. Routes
//! come in two flavours:
//!
//! - **Public**: signup/login plus read-only browsing (products, galleries,
//!   events, articles, comments, reviews).
//! - **Protected**: everything else, behind the session middleware, which
//!   also rejects blocked accounts on every request.

use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::backend::admin;
use crate::backend::articles;
use crate::backend::auth::{get_me, login, logout, signup};
use crate::backend::comments;
use crate::backend::events;
use crate::backend::galleries;
use crate::backend::media::upload_media;
use crate::backend::messaging;
use crate::backend::notifications;
use crate::backend::orders;
use crate::backend::profiles;
use crate::backend::reports;
use crate::backend::reviews;
use crate::backend::products;
use crate::backend::server::state::AppState;

/// Routes that work without a session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Authentication
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        // Browsing
        .route("/api/products", get(products::handlers::list_products))
        .route("/api/products/{id}", get(products::handlers::get_product))
        .route(
            "/api/products/{id}/reviews",
            get(reviews::handlers::list_reviews),
        )
        .route("/api/galleries", get(galleries::handlers::list_galleries))
        .route("/api/galleries/{id}", get(galleries::handlers::get_gallery))
        .route("/api/events", get(events::handlers::list_events))
        .route("/api/events/{id}", get(events::handlers::get_event))
        .route("/api/articles", get(articles::handlers::list_articles))
        .route("/api/articles/{id}", get(articles::handlers::get_article))
        .route("/api/comments", get(comments::handlers::list_comments))
        // Profiles are publicly viewable
        .route("/api/users/{id}", get(profiles::handlers::get_profile))
}

/// Routes that require an authenticated, unblocked session
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // Session
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(get_me))
        // Profiles and personal block list
        .route("/api/users/{id}", put(profiles::handlers::update_profile))
        .route(
            "/api/users/{id}/block",
            post(profiles::handlers::block).delete(profiles::handlers::unblock),
        )
        // Favorites
        .route("/api/favorites", post(profiles::favorites::toggle_favorite))
        .route(
            "/api/users/{id}/favorites",
            get(profiles::favorites::list_favorites),
        )
        // Products
        .route("/api/products", post(products::handlers::create_product))
        .route(
            "/api/products/{id}",
            put(products::handlers::update_product).delete(products::handlers::delete_product),
        )
        // Reviews
        .route(
            "/api/products/{id}/reviews",
            post(reviews::handlers::create_review),
        )
        .route(
            "/api/reviews/{id}",
            put(reviews::handlers::update_review).delete(reviews::handlers::delete_review),
        )
        // Galleries
        .route("/api/galleries", post(galleries::handlers::create_gallery))
        .route(
            "/api/galleries/{id}",
            put(galleries::handlers::update_gallery).delete(galleries::handlers::delete_gallery),
        )
        .route(
            "/api/galleries/{id}/collaborators",
            put(galleries::handlers::update_collaborators),
        )
        .route(
            "/api/galleries/{id}/collaborators/respond",
            post(galleries::handlers::respond_to_invite),
        )
        .route(
            "/api/galleries/{id}/products",
            put(galleries::handlers::update_gallery_products),
        )
        // Events
        .route("/api/events", post(events::handlers::create_event))
        .route(
            "/api/events/{id}",
            put(events::handlers::update_event).delete(events::handlers::delete_event),
        )
        .route("/api/events/{id}/rsvp", post(events::handlers::rsvp))
        // Articles
        .route("/api/articles", post(articles::handlers::create_article))
        .route(
            "/api/articles/{id}",
            put(articles::handlers::update_article).delete(articles::handlers::delete_article),
        )
        // Comments
        .route("/api/comments", post(comments::handlers::create_comment))
        .route(
            "/api/comments/{id}",
            delete(comments::handlers::delete_comment),
        )
        .route(
            "/api/comments/{id}/react",
            post(comments::handlers::react_to_comment),
        )
        // Messaging
        .route("/api/messages", post(messaging::handlers::send_message))
        .route(
            "/api/messages/{id}",
            get(messaging::handlers::get_conversation),
        )
        .route(
            "/api/messages/{id}/read",
            patch(messaging::handlers::mark_message_read),
        )
        .route(
            "/api/conversations",
            get(messaging::handlers::list_conversations),
        )
        // Cart / checkout / orders
        .route(
            "/api/cart",
            get(orders::handlers::get_cart).post(orders::handlers::add_to_cart),
        )
        .route(
            "/api/cart/{kind}/{id}",
            delete(orders::handlers::remove_from_cart),
        )
        .route("/api/checkout", post(orders::handlers::checkout))
        .route(
            "/api/checkout/confirm/{order_id}",
            get(orders::handlers::confirm_checkout),
        )
        .route("/api/orders", get(orders::handlers::list_orders))
        .route("/api/orders/{id}", get(orders::handlers::get_order))
        .route(
            "/api/orders/{id}/status",
            patch(orders::handlers::update_order_status),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(notifications::handlers::list_notifications),
        )
        .route(
            "/api/notifications/{id}/seen",
            patch(notifications::handlers::mark_notification_seen),
        )
        .route(
            "/api/notifications/seen",
            post(notifications::handlers::mark_all_notifications_seen),
        )
        .route(
            "/api/notifications/{id}",
            delete(notifications::handlers::delete_notification),
        )
        // Reports
        .route("/api/reports", post(reports::handlers::create_report))
        // Media
        .route("/api/media/upload", post(upload_media))
        // Admin
        .route("/api/admin/users", get(admin::handlers::list_users))
        .route(
            "/api/admin/users/{id}/block",
            post(admin::handlers::block_user),
        )
        .route(
            "/api/admin/users/{id}/unblock",
            post(admin::handlers::unblock_user),
        )
        .route(
            "/api/admin/users/{id}",
            delete(admin::handlers::delete_user),
        )
        .route("/api/admin/reports", get(reports::handlers::list_reports))
        .route(
            "/api/admin/reports/{id}",
            patch(reports::handlers::resolve_report),
        )
        .route("/api/admin/audit", get(admin::handlers::list_audit_logs))
}
