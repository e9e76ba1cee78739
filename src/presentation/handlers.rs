// HTTP request handlers
use crate::application::error::DashboardError;
use crate::domain::news::NewsArticle;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct NewsIngestRequest {
    pub format: Option<String>,
    pub source: Option<String>,
    #[serde(default)]
    pub items: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsIngestResponse {
    pub kept: usize,
    pub news_data: Vec<NewsArticle>,
    pub last_news_update: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct NewsLoadingRequest {
    pub loading: bool,
}

#[derive(Deserialize)]
pub struct NewsErrorRequest {
    pub error: Option<String>,
}

async fn respond<T: Serialize>(headers: &HeaderMap, status: StatusCode, data: &T) -> Response {
    match json_response(status, data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

fn error_response(error: DashboardError) -> Response {
    let message = error.to_string();
    match error {
        DashboardError::InvalidApplication { errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": message, "errors": errors })),
        )
            .into_response(),
        DashboardError::ApplicationNotFound(_) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
        }
        DashboardError::StoreTask(_) => {
            tracing::error!("{}", message);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message }))).into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full dashboard snapshot
pub async fn get_dashboard(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.dashboard_service.snapshot().await;
    respond(&headers, StatusCode::OK, &snapshot).await
}

pub async fn list_applications(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let applications = state.dashboard_service.list_applications().await;
    respond(&headers, StatusCode::OK, &applications).await
}

pub async fn create_application(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(candidate): Json<Value>,
) -> Response {
    match state.dashboard_service.add_application(&candidate).await {
        Ok(application) => respond(&headers, StatusCode::CREATED, &application).await,
        Err(e) => error_response(e),
    }
}

pub async fn update_application(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(changes): Json<Value>,
) -> Response {
    match state.dashboard_service.update_application(&id, &changes).await {
        Ok(application) => respond(&headers, StatusCode::OK, &application).await,
        Err(e) => error_response(e),
    }
}

pub async fn delete_application(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.dashboard_service.delete_application(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Normalize a batch of raw feed items into the news panel
pub async fn ingest_news(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewsIngestRequest>,
) -> Response {
    let result = state
        .dashboard_service
        .ingest_news(
            &request.items,
            request.format.as_deref(),
            request.source.as_deref(),
        )
        .await;
    let (kept, snapshot) = match result {
        Ok(ingested) => ingested,
        Err(e) => return error_response(e),
    };

    let body = NewsIngestResponse {
        kept,
        news_data: snapshot.news_data,
        last_news_update: snapshot.last_news_update,
    };
    respond(&headers, StatusCode::OK, &body).await
}

pub async fn set_news_loading(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewsLoadingRequest>,
) -> Response {
    match state.dashboard_service.set_news_loading(request.loading).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn set_news_error(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NewsErrorRequest>,
) -> Response {
    match state.dashboard_service.set_news_error(request.error).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn storage_status(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.storage_status().await {
        Ok(status) => respond(&headers, StatusCode::OK, &status).await,
        Err(e) => error_response(e),
    }
}

/// Forget every persisted record
pub async fn clear_storage(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.clear_storage().await {
        Ok(cleared) => respond(&headers, StatusCode::OK, &json!({ "cleared": cleared })).await,
        Err(e) => error_response(e),
    }
}
