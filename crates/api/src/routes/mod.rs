//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::session_middleware};

pub mod auth;
pub mod health;
pub mod params;
pub mod projects;
pub mod receipts;
pub mod views;

#[cfg(test)]
mod tests;

/// Creates the API router with public and session-protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(projects::routes())
        .merge(views::routes())
        .merge(receipts::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
