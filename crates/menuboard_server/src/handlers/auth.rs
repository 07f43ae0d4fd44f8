//! Login/logout handlers.

use super::{json_body, SuccessResponse};
use crate::auth::{cleared_session_cookie, is_authenticated, session_cookie, set_cookie_header};
use crate::{error::HttpError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

/// Credentials submitted by the login form.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Verify the admin credentials and issue a session cookie.
///
/// # Returns
/// `{ "success": true }` with a `Set-Cookie` header.
///
/// # Errors
/// Returns 500 when the auth environment is not configured and 401 when the
/// credentials do not match.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let req = json_body(payload)?;
    let (Some(auth), Some(signer)) = (state.config.auth.as_ref(), state.signer.as_deref()) else {
        tracing::error!("Login attempted without ADMIN_USER/ADMIN_PASS/SESSION_SECRET configured");
        return Err(HttpError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Auth environment variables are not configured.",
        ));
    };

    if !auth.identity.matches(&req.username, &req.password) {
        tracing::warn!("Rejected login for user '{}'", req.username.trim());
        return Err(HttpError::new(
            StatusCode::UNAUTHORIZED,
            "Invalid username or password.",
        ));
    }

    let token = signer.issue()?;
    let cookie = set_cookie_header(&session_cookie(&token, state.config.secure_cookies))?;
    tracing::info!("Admin '{}' logged in", auth.identity.username());
    Ok(([(header::SET_COOKIE, cookie)], SuccessResponse::ok()).into_response())
}

/// Clear the session cookie.
///
/// # Errors
/// Returns 500 if the cookie header cannot be built.
pub async fn logout(State(state): State<AppState>) -> Result<Response, HttpError> {
    let cookie = set_cookie_header(&cleared_session_cookie(state.config.secure_cookies))?;
    Ok(([(header::SET_COOKIE, cookie)], SuccessResponse::ok()).into_response())
}

/// Report login state, redirecting authenticated sessions to `/admin`.
pub async fn login_status(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if is_authenticated(&state, &headers) {
        return Redirect::to("/admin").into_response();
    }
    Json(json!({ "authenticated": false })).into_response()
}
