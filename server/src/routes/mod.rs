//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the profile service's JSON endpoints under a single
//! Axum router with permissive CORS (browser front ends call it directly)
//! and request tracing.

pub mod auth;
pub mod log;
pub mod profile;

use axum::Router;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use profiles::ApiResponse;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::services::accounts::AccountError;
use crate::state::AppState;

pub(crate) const INVALID_JSON: &str = "Malformed JSON body.";

/// Build the application router.
pub fn app(state: AppState, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/api/google-auth", post(auth::google_auth))
        .route("/api/editar_usuario", post(profile::editar_usuario))
        .route("/api/log", post(log::receive_log))
        .route("/healthz", get(healthz))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        None => AllowOrigin::from(Any),
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "invalid CORS_ALLOW_ORIGIN; allowing any origin");
            AllowOrigin::from(Any)
        }
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// `{success:false}` JSON body with the given status.
pub(crate) fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::failed(message))).into_response()
}

/// 500 for a storage failure.
pub(crate) fn server_error(err: &AccountError) -> Response {
    tracing::error!(error = %err, "account store failed");
    failure(StatusCode::INTERNAL_SERVER_ERROR, format!("server error: {err}"))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
