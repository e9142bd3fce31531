pub mod api;
pub mod form;
pub mod health;
pub mod pages;

pub use api::*;
pub use form::*;
pub use health::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Todas as rotas do distribuidor
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        // Formulário HTML
        .route("/", get(show_form))
        .route("/senhas", post(submit_form))
        // API JSON
        .route("/api/areas", get(list_areas))
        .route("/api/senhas", post(create_ticket))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
