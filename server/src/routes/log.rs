//! Front-end log route.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use profiles::{ApiResponse, LogEntryRequest};

use super::{INVALID_JSON, failure};
use crate::services::frontend_log;
use crate::state::AppState;

pub(crate) const LOG_RECEIVED: &str = "Log received.";
pub(crate) const NO_LOG_ENTRY: &str = "No log entry provided.";

/// `POST /api/log`: record one `{logEntry}` line.
pub async fn receive_log(State(state): State<AppState>, body: Bytes) -> Response {
    let request: LogEntryRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(_) => return failure(StatusCode::BAD_REQUEST, INVALID_JSON),
    };
    let Some(entry) = request.log_entry else {
        return Json(ApiResponse::failed(NO_LOG_ENTRY)).into_response();
    };

    match frontend_log::record(state.frontend_log.as_deref(), &entry).await {
        Ok(()) => Json(ApiResponse::ok(LOG_RECEIVED)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "frontend log write failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Log could not be written.")
        }
    }
}

#[cfg(test)]
#[path = "log_test.rs"]
mod tests;
