//! Session cookies and route guards.

use crate::{error::HttpError, AppState};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use menuboard_core::constants::{SESSION_COOKIE_NAME, SESSION_MAX_AGE_SECS};

/// Extract the session token from `Cookie` headers, if present.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, token)| token)
        .filter(|token| !token.is_empty())
}

/// Whether the request carries a session cookie that verifies.
pub fn is_authenticated(state: &AppState, headers: &HeaderMap) -> bool {
    match (state.signer.as_deref(), session_token(headers)) {
        (Some(signer), Some(token)) => signer.verify(token),
        _ => false,
    }
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME, token, SESSION_MAX_AGE_SECS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing the session.
pub fn cleared_session_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE_NAME
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub(crate) fn set_cookie_header(value: &str) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(value).map_err(|err| {
        tracing::error!("Invalid Set-Cookie value: {}", err);
        HttpError::from(menuboard_core::AppError::Internal)
    })
}

/// Guard for JSON API routes: missing or invalid sessions get a 401 body.
pub async fn require_api_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_authenticated(&state, request.headers()) {
        return next.run(request).await;
    }
    tracing::warn!(
        "Rejected unauthenticated {} {}",
        request.method(),
        request.uri().path()
    );
    HttpError::unauthorized().into_response()
}

/// Guard for admin pages: missing or invalid sessions are sent to `/login`.
pub async fn require_page_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_authenticated(&state, request.headers()) {
        return next.run(request).await;
    }
    Redirect::to("/login").into_response()
}
