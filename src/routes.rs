//! HTTP surface: three dream endpoints plus a health check.

use crate::dreams::DreamService;
use crate::models::{DreamRequest, DreamResponse, ErrorResponse};
use crate::{Error, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub dreams: DreamService,
}

impl AppState {
    pub fn new(dreams: DreamService) -> Self {
        Self { dreams }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
    }
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse { detail })).into_response()
}

/// Malformed bodies get a 422 in the same `{"detail": ...}` shape.
fn reject(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection.body_text(), "Rejected request body");
    error_response(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/dreams", post(generate_dream))
        .route("/random_dream", get(random_dream))
        .route("/validate_dream", post(validate_dream))
        .with_state(state)
}

/// Credentialed CORS restricted to `origins`.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| Error::Config(format!("Invalid CORS origin '{}'", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Router with CORS and request tracing applied.
pub fn app(state: AppState, origins: &[String]) -> Result<Router> {
    Ok(router(state)
        .layer(cors_layer(origins)?)
        .layer(TraceLayer::new_for_http()))
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /dreams
async fn generate_dream(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DreamRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return reject(rejection),
    };

    match state.dreams.generate_letter(&request.dreams).await {
        Ok(content) => Json(DreamResponse::new(content)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /random_dream
async fn random_dream(State(state): State<AppState>) -> Result<Json<DreamResponse>> {
    let content = state.dreams.random_dream().await?;
    Ok(Json(DreamResponse::new(content)))
}

/// POST /validate_dream
async fn validate_dream(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DreamRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return reject(rejection),
    };

    match state.dreams.validate_dream(&request.dreams).await {
        Ok(content) => Json(DreamResponse::new(content)).into_response(),
        Err(e) => e.into_response(),
    }
}
