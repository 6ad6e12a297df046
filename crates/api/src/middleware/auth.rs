//! Session gate for protected routes.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use fluxo_core::session::ReportSession;
use fluxo_shared::SessionToken;
use serde_json::json;
use tracing::debug;

use crate::AppState;

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Reads the session token from the request cookies.
pub fn session_token(jar: &CookieJar, cookie_name: &str) -> Option<SessionToken> {
    jar.get(cookie_name)
        .and_then(|cookie| cookie.value().parse().ok())
}

/// Rejects requests whose cookie does not name a live session.
///
/// On success the session is stored in request extensions for
/// [`CurrentSession`] to pick up.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(&jar, &state.config.auth.cookie_name) else {
        return unauthorized("Login required");
    };

    let Some(session) = state.sessions.get(&token) else {
        debug!("Request with unknown session token");
        return unauthorized("Session expired or unknown");
    };

    request
        .extensions_mut()
        .insert(CurrentSession { token, session });
    next.run(request).await
}

/// The caller's session.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    /// Session token.
    pub token: SessionToken,
    /// Result lists owned by the session.
    pub session: Arc<ReportSession>,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| unauthorized("Login required"))
    }
}
