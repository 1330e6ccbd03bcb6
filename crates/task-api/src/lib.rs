//! HTTP API for the personal task manager.
//!
//! Routes are built against an injectable [`AppState`] so tests (and
//! credential-less local runs) can swap the DynamoDB repositories for the
//! in-memory ones.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use infrastructure::{InMemoryTaskStore, InMemoryUserStore, TaskStore, UserStore};
use shared::TokenService;

mod error;
mod extract;
mod handlers;
mod models;

pub use error::ApiError;
pub use extract::AuthUser;

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub tokens: TokenService,
}

impl AppState {
    /// State backed by the in-memory stores.
    pub fn in_memory(tokens: TokenService) -> Self {
        Self {
            users: Arc::new(InMemoryUserStore::default()),
            tasks: Arc::new(InMemoryTaskStore::default()),
            tokens,
        }
    }
}

/// Builds the router with all routes and middleware.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/users/register", post(handlers::users::register))
        .route("/api/users/login", post(handlers::users::login))
        .route("/api/users/profile", get(handlers::users::profile))
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/api/tasks/:id",
            get(handlers::tasks::get_task)
                .put(handlers::tasks::update_task)
                .delete(handlers::tasks::delete_task),
        )
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive CORS so the single-page client can call from another origin.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthBody { status: "ok" })
}
