//! LibraryMS - role-based library management server
//!
//! REST JSON API behind the LibraryMS dashboard: books, categories, users
//! and loans ("emprunts"), gated by a single role-based access policy
//! shared between route guarding and navigation.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod access;
pub mod api;
pub mod config;
pub mod demo;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Navigation
        .route("/navigation", get(api::navigation::get_navigation))
        // Books
        .route("/books", get(api::books::list_books).post(api::books::create_book))
        .route(
            "/books/:id",
            get(api::books::get_book)
                .put(api::books::update_book)
                .delete(api::books::delete_book),
        )
        // Categories
        .route(
            "/categories",
            get(api::categories::list_categories).post(api::categories::create_category),
        )
        .route(
            "/categories/:id",
            put(api::categories::update_category).delete(api::categories::delete_category),
        )
        // Users (read-only)
        .route("/users", get(api::users::list_users))
        .route("/users/:id", get(api::users::get_user))
        // Emprunts
        .route(
            "/emprunts",
            get(api::emprunts::list_emprunts).post(api::emprunts::create_emprunt),
        )
        .route("/emprunts/my", get(api::emprunts::list_my_emprunts))
        .route("/emprunts/:id/validate", put(api::emprunts::validate_emprunt))
        .route("/emprunts/:id/close", put(api::emprunts::close_emprunt))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
