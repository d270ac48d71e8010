//! # REST API
//!
//! HTTP face of the document service. The web client posts its whole state
//! as the `user_data` form field and reads it back as JSON.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/api/users` | stored logins |
//! | GET | `/api/users/:login` | stored document |
//! | POST | `/api/users/:login` | save `user_data` |
//! | DELETE | `/api/users/:login` | forget a user |
//! | GET | `/api/users/:login/statistics` | monthly totals and allocation |

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde_json::json;
use shared::SaveForm;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::services::{DocumentService, ServiceError};

#[derive(Clone)]
pub struct AppState {
    pub document_service: DocumentService,
}

impl AppState {
    pub fn new(document_service: DocumentService) -> Self {
        Self { document_service }
    }
}

/// API routes only
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:login",
            get(get_document).post(save_document).delete(delete_document),
        )
        .route("/users/:login/statistics", get(get_statistics));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// API routes plus CORS and the optional static client directory
pub fn build_app(state: AppState, config: &ServerConfig) -> Result<Router> {
    let origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin {:?}", config.allowed_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    let mut app = router(state);
    if let Some(dir) = &config.static_dir {
        info!("Serving client assets from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    Ok(app.layer(cors))
}

fn error_response(err: ServiceError) -> Response {
    let (status, code) = match &err {
        ServiceError::Decode(_) => (StatusCode::BAD_REQUEST, "INVALID_DOCUMENT"),
        ServiceError::LoginMismatch { .. } => (StatusCode::BAD_REQUEST, "LOGIN_MISMATCH"),
        ServiceError::UnknownLogin(_) => (StatusCode::NOT_FOUND, "UNKNOWN_LOGIN"),
        ServiceError::Throttled { .. } => (StatusCode::TOO_MANY_REQUESTS, "SAVE_THROTTLED"),
        ServiceError::Storage(e) => {
            error!("Storage error: {:?}", e);
            let body = json!({ "error": "Internal storage error", "code": "STORAGE_ERROR" });
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
        }
    };

    let body = Json(json!({ "error": err.to_string(), "code": code }));
    match err {
        ServiceError::Throttled { retry_after } => {
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            (status, [(header::RETRY_AFTER, seconds.to_string())], body).into_response()
        }
        _ => (status, body).into_response(),
    }
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Response {
    info!("GET /api/users");

    match state.document_service.list_logins().await {
        Ok(logins) => Json(logins).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/users/:login
pub async fn get_document(State(state): State<AppState>, Path(login): Path<String>) -> Response {
    info!("GET /api/users/{}", login);

    match state.document_service.load_document(&login).await {
        Ok(document) => Json(document).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/users/:login
pub async fn save_document(
    State(state): State<AppState>,
    Path(login): Path<String>,
    Form(form): Form<SaveForm>,
) -> Response {
    info!("POST /api/users/{} - {} bytes", login, form.user_data.len());

    match state.document_service.save(&login, &form.user_data).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/users/:login
pub async fn delete_document(State(state): State<AppState>, Path(login): Path<String>) -> Response {
    info!("DELETE /api/users/{}", login);

    match state.document_service.delete(&login).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/users/:login/statistics
pub async fn get_statistics(State(state): State<AppState>, Path(login): Path<String>) -> Response {
    info!("GET /api/users/{}/statistics", login);

    match state.document_service.statistics(&login).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => error_response(e),
    }
}
