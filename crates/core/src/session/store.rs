//! Live sessions with idle expiry, using Moka.

use std::sync::Arc;
use std::time::Duration;

use fluxo_shared::SessionToken;
use moka::sync::Cache;

use super::report::ReportSession;

/// Default cap on live sessions.
const DEFAULT_MAX_SESSIONS: u64 = 10_000;

/// Default idle timeout (30 minutes).
const DEFAULT_IDLE_SECS: u64 = 1800;

/// Live report sessions by token.
///
/// A session that sees no lookup for the idle timeout is evicted together
/// with its result lists. Thread-safe and cheap to clone.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<SessionToken, Arc<ReportSession>>,
}

impl SessionStore {
    /// Creates a store with default settings.
    ///
    /// Default: 10 000 sessions max, 30 minute idle timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MAX_SESSIONS, Duration::from_secs(DEFAULT_IDLE_SECS))
    }

    /// Creates a store with a custom capacity and idle timeout.
    #[must_use]
    pub fn with_config(max_sessions: u64, idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_sessions)
            .time_to_idle(idle)
            .build();

        Self { cache }
    }

    /// Opens a fresh session and returns its token.
    pub fn open(&self) -> SessionToken {
        let token = SessionToken::new();
        self.cache.insert(token, Arc::new(ReportSession::new()));
        token
    }

    /// Looks up a live session. Each hit resets its idle timer.
    pub fn get(&self, token: &SessionToken) -> Option<Arc<ReportSession>> {
        self.cache.get(token)
    }

    /// Drops a session. Returns whether it was live.
    pub fn close(&self, token: &SessionToken) -> bool {
        self.cache.remove(token).is_some()
    }

    /// Number of live sessions.
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    /// Whether no session is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
