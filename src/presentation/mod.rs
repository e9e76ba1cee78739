// Presentation layer - HTTP routes over the dashboard service
pub mod app_state;
pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    clear_storage, create_application, delete_application, get_dashboard, health_check,
    ingest_news, list_applications, set_news_error, set_news_loading, storage_status,
    update_application,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/applications", get(list_applications).post(create_application))
        .route(
            "/applications/:id",
            put(update_application).delete(delete_application),
        )
        .route("/news", post(ingest_news))
        .route("/news/loading", post(set_news_loading))
        .route("/news/error", post(set_news_error))
        .route("/storage", get(storage_status).delete(clear_storage))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
