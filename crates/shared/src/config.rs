//! Application configuration management.

use std::collections::HashMap;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Remote tabular store configuration.
    pub store: StoreConfig,
    /// Table names in the remote store.
    #[serde(default)]
    pub tables: TableNames,
    /// Shared-secret gate configuration.
    pub auth: AuthConfig,
    /// Keyword filters per view, keyed by view slug (`dashboard`, `nfe`, ...).
    #[serde(default)]
    pub views: HashMap<String, ViewKeywords>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Remote tabular store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the REST endpoint (e.g. `https://xyz.example.co/rest/v1`).
    pub url: String,
    /// API key sent as `apikey` and bearer token.
    pub api_key: String,
    /// Optional schema profile sent with every request.
    #[serde(default)]
    pub schema: Option<String>,
    /// Hard per-request row cap enforced by the store.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Maximum keys per bulk `in` lookup request.
    #[serde(default = "default_lookup_chunk_size")]
    pub lookup_chunk_size: usize,
    /// Ask the store for exact totals so the fetcher can stop early.
    #[serde(default = "default_exact_count")]
    pub exact_count: bool,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_page_size() -> usize {
    1000
}

fn default_lookup_chunk_size() -> usize {
    200
}

fn default_exact_count() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

/// Table names in the remote store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableNames {
    /// Ledger movements (payable/receivable installments).
    pub movements: String,
    /// Purchase invoice headers.
    pub invoices: String,
    /// Purchase invoice line items.
    pub line_items: String,
    /// Receivables.
    pub receipts: String,
    /// Project lookup.
    pub projects: String,
    /// Category lookup.
    pub categories: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            movements: "movements".to_string(),
            invoices: "invoices".to_string(),
            line_items: "invoice_items".to_string(),
            receipts: "receipts".to_string(),
            projects: "projects".to_string(),
            categories: "categories".to_string(),
        }
    }
}

/// Shared-secret gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// The single process-wide secret.
    pub shared_secret: String,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Seconds without a request before a session is dropped.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
    /// Upper bound on live sessions.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

fn default_cookie_name() -> String {
    "fluxo_session".to_string()
}

const fn default_session_idle_secs() -> u64 {
    1800
}

const fn default_max_sessions() -> u64 {
    10_000
}

/// Include/exclude keyword lists for one view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewKeywords {
    /// Rows must contain at least one of these (when non-empty).
    #[serde(default)]
    pub include: Vec<String>,
    /// Rows containing any of these are dropped.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FLUXO").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Returns the keyword lists configured for a view, empty when absent.
    ///
    /// A `*-detail` view without its own section uses the lists of its base
    /// view, so `nfe-detail` hides what `nfe` hides.
    #[must_use]
    pub fn view_keywords(&self, view: &str) -> ViewKeywords {
        self.views
            .get(view)
            .or_else(|| {
                view.strip_suffix("-detail")
                    .and_then(|base| self.views.get(base))
            })
            .cloned()
            .unwrap_or_default()
    }
}
