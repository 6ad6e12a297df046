//! PostgREST-style HTTP store.

use std::time::Duration;

use async_trait::async_trait;
use fluxo_shared::RowRange;
use fluxo_shared::config::StoreConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

use super::{Filter, Page, Query, RemoteStore, StoreError};

/// HTTP client for a PostgREST-compatible endpoint.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
    schema: Option<String>,
    exact_count: bool,
}

impl RestStore {
    /// Creates a client from store configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            schema: config.schema.clone(),
            exact_count: config.exact_count,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Store rejected request");
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn select(&self, query: &Query, range: RowRange) -> Result<Page, StoreError> {
        debug!(table = %query.table, range = %range.header_value(), "Store select");

        let mut request = self
            .authorize(self.client.get(self.table_url(&query.table)))
            .query(&query_params(query))
            .header("Range-Unit", "items")
            .header("Range", range.header_value());
        if self.exact_count {
            request = request.header("Prefer", "count=exact");
        }
        if let Some(schema) = &self.schema {
            request = request.header("Accept-Profile", schema);
        }

        let response = Self::check(request.send().await?).await?;
        let total = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_range_total);
        let rows: Vec<Value> = response.json().await?;

        Ok(Page { rows, total })
    }

    async fn update(
        &self,
        table: &str,
        key_column: &str,
        key: &Value,
        patch: &Value,
    ) -> Result<(), StoreError> {
        debug!(table, key_column, key = %key, "Store update");

        let rendered = render_value(key);
        let mut request = self
            .authorize(self.client.patch(self.table_url(table)))
            .query(&[
                (key_column, format!("eq.{rendered}")),
                ("select", key_column.to_string()),
            ])
            .header("Prefer", "return=representation")
            .json(patch);
        if let Some(schema) = &self.schema {
            request = request.header("Content-Profile", schema);
        }

        // A PATCH that matches nothing still succeeds, with an empty array.
        let updated: Vec<Value> = Self::check(request.send().await?).await?.json().await?;
        if updated.is_empty() {
            warn!(table, key_column, key = %rendered, "Update matched no row");
            return Err(StoreError::NotFound {
                table: table.to_string(),
                key: format!("{key_column}={rendered}"),
            });
        }
        Ok(())
    }
}

/// Renders `select`, filters and `order` as PostgREST query parameters.
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.select.clone())];

    for filter in &query.filters {
        params.push(match filter {
            Filter::Eq(column, value) => (column.clone(), format!("eq.{}", render_value(value))),
            Filter::Gte(column, value) => (column.clone(), format!("gte.{}", render_value(value))),
            Filter::Lte(column, value) => (column.clone(), format!("lte.{}", render_value(value))),
            Filter::In(column, values) => (column.clone(), format!("in.({})", render_list(values))),
            Filter::And(inner) => ("and".to_string(), format!("({})", render_group(inner))),
            Filter::Or(inner) => ("or".to_string(), format!("({})", render_group(inner))),
        });
    }

    if !query.order.is_empty() {
        let order = query
            .order
            .iter()
            .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
            .collect::<Vec<_>>()
            .join(",");
        params.push(("order".to_string(), order));
    }

    params
}

/// Renders a filter nested inside a logical group.
fn render_nested(filter: &Filter) -> String {
    match filter {
        Filter::Eq(column, value) => format!("{column}.eq.{}", render_value(value)),
        Filter::Gte(column, value) => format!("{column}.gte.{}", render_value(value)),
        Filter::Lte(column, value) => format!("{column}.lte.{}", render_value(value)),
        Filter::In(column, values) => format!("{column}.in.({})", render_list(values)),
        Filter::And(inner) => format!("and({})", render_group(inner)),
        Filter::Or(inner) => format!("or({})", render_group(inner)),
    }
}

fn render_group(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(render_nested)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_list(values: &[Value]) -> String {
    values.iter().map(render_value).collect::<Vec<_>>().join(",")
}

/// Renders a scalar, double-quoting strings that contain reserved characters.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => {
            let reserved = s.trim() != s
                || s.chars().any(|c| matches!(c, ',' | '(' | ')' | '"' | '\\' | ':'));
            if reserved {
                format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            } else {
                s.clone()
            }
        }
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Extracts the total from a `Content-Range` value such as `0-999/4321`.
///
/// Returns `None` when the total is unknown (`*`).
pub(crate) fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}
