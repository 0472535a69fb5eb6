//! Provider sign-in route.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use profiles::ProviderSignInRequest;

use super::{INVALID_JSON, failure, server_error};
use crate::services::provider_auth;
use crate::state::AppState;

/// `POST /api/google-auth`: find, link or create the account for a provider
/// identity and return it.
pub async fn google_auth(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ProviderSignInRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "sign-in body rejected");
            return failure(StatusCode::BAD_REQUEST, INVALID_JSON);
        }
    };
    tracing::debug!(email = ?request.email, has_provider_id = request.provider_id.is_some(), "provider sign-in");

    match provider_auth::sign_in(state.accounts.as_ref(), &request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => server_error(&e),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
