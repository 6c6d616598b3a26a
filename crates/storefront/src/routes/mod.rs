//! HTTP route handlers for the store.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog listing
//! GET  /product/{id}           - Product detail
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Cart
//! GET  /cart                   - Cart page
//! GET  /cart/add/{id}          - Add one unit, back to catalog
//!
//! # Checkout
//! GET  /checkout               - Order confirmation
//! POST /checkout               - Place the order
//!
//! # Auth (rate limited)
//! GET  /register, POST /register
//! GET  /login,    POST /login
//! GET  /logout
//!
//! # Orders (requires login)
//! GET  /orders                 - Own order history
//! GET  /orders/{id}            - Order receipt
//!
//! # Admin (requires admin)
//! GET  /admin                  - Product list
//! GET  /admin/add, POST /admin/add
//! GET  /admin/edit/{id}, POST /admin/edit/{id}
//! GET  /admin/delete/{id}
//! GET  /admin/orders           - Every order
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod orders;
pub mod products;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::StoreConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the login and registration routes, rate limited when enabled.
pub fn auth_routes(config: &StoreConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register));

    if !config.rate_limit {
        return router;
    }

    match auth_rate_limiter(config.trust_proxy_headers) {
        Some(limiter) => router.layer(limiter),
        None => {
            tracing::warn!("Rate limiter configuration rejected; auth routes are unlimited");
            router
        }
    }
}

/// Create the admin routes router.
///
/// Product forms carry images, so the body limit is the configured upload
/// size rather than axum's default.
pub fn admin_routes(config: &StoreConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(admin::index))
        .route("/add", get(admin::add_page).post(admin::add))
        .route("/edit/{id}", get(admin::edit_page).post(admin::edit))
        .route("/delete/{id}", get(admin::delete))
        .route("/orders", get(admin::orders))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
}

/// Create the order history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the store.
pub fn routes(config: &StoreConfig) -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::index))
        .route("/product/{id}", get(products::show))
        // Cart and checkout
        .route("/cart", get(cart::show))
        .route("/cart/add/{id}", get(cart::add))
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Accounts
        .merge(auth_routes(config))
        .route("/logout", get(auth::logout))
        .nest("/orders", order_routes())
        // Admin panel
        .nest("/admin", admin_routes(config))
        // Health checks
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
