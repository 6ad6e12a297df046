//! Shared-secret login and logout.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use fluxo_shared::LoginRequest;
use serde_json::json;
use tracing::{info, warn};

use crate::AppState;
use crate::middleware::auth::session_token;

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// POST /auth/login - Open a session when the secret matches.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    if !state.secret.verify(&payload.secret) {
        warn!("Login attempt with wrong secret");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "unauthorized",
                "message": "Invalid secret"
            })),
        )
            .into_response();
    }

    let token = state.sessions.open();
    info!(sessions = state.sessions.len(), "Session opened");

    let cookie = Cookie::build((state.config.auth.cookie_name.clone(), token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), Json(json!({ "status": "ok" }))).into_response()
}

/// POST /auth/logout - Drop the caller's session and clear the cookie.
async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let cookie_name = state.config.auth.cookie_name.clone();
    if let Some(token) = session_token(&jar, &cookie_name) {
        if state.sessions.close(&token) {
            info!("Session closed");
        }
    }

    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));
    (jar, Json(json!({ "status": "ok" })))
}
