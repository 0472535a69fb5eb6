//! Profile update route.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{Map, Value};

use super::{INVALID_JSON, failure, server_error};
use crate::services::profile as profile_svc;
use crate::state::AppState;

/// `POST /api/editar_usuario`: apply a partial update `{id, <fields>}`.
pub async fn editar_usuario(State(state): State<AppState>, body: Bytes) -> Response {
    let body: Map<String, Value> = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(error = %e, "update body rejected");
            return failure(StatusCode::BAD_REQUEST, INVALID_JSON);
        }
    };

    let plan = match profile_svc::plan_update(&body) {
        Ok(plan) => plan,
        Err(e) => return failure(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match profile_svc::apply_update(state.accounts.as_ref(), &plan).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => server_error(&e),
    }
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
