//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for views, receipts and lookups
//! - The shared-secret session gate
//! - Error to response mapping

pub mod error;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use fluxo_core::session::SessionStore;
use fluxo_db::repositories::ReceiptRepository;
use fluxo_db::{Fetcher, ReceiptService, RemoteStore, ReportPipeline};
use fluxo_shared::{AppConfig, SharedSecret};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Report pipeline over the remote store.
    pub pipeline: Arc<ReportPipeline>,
    /// Receipt reads and status writes.
    pub receipts: Arc<ReceiptService>,
    /// Live sessions by token, evicted when idle.
    pub sessions: SessionStore,
    /// The configured shared secret.
    pub secret: Arc<SharedSecret>,
}

impl AppState {
    /// Wires the services over `store`.
    pub fn new(config: AppConfig, store: Arc<dyn RemoteStore>) -> Self {
        let fetcher = Fetcher::new(store, config.store.page_size as u64);
        let pipeline = ReportPipeline::new(&fetcher, &config.tables, config.store.lookup_chunk_size);
        let receipts = ReceiptService::new(ReceiptRepository::new(fetcher, &config.tables.receipts));
        let secret = SharedSecret::new(config.auth.shared_secret.clone());
        let sessions = SessionStore::with_config(
            config.auth.max_sessions,
            Duration::from_secs(config.auth.session_idle_secs),
        );

        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            receipts: Arc::new(receipts),
            sessions,
            secret: Arc::new(secret),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
