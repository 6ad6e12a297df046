//! Project and category lookups.

use fluxo_core::reconcile::{Category, Project};
use fluxo_shared::types::{CategoryId, ProjectId};
use serde_json::Value;

use super::fetch_by_keys;
use crate::store::{Fetcher, Query, StoreError};

/// Lookup table repository.
#[derive(Debug, Clone)]
pub struct LookupRepository {
    fetcher: Fetcher,
    projects_table: String,
    categories_table: String,
    chunk_size: usize,
}

impl LookupRepository {
    /// Creates a new lookup repository.
    pub fn new(
        fetcher: Fetcher,
        projects_table: impl Into<String>,
        categories_table: impl Into<String>,
        chunk_size: usize,
    ) -> Self {
        Self {
            fetcher,
            projects_table: projects_table.into(),
            categories_table: categories_table.into(),
            chunk_size,
        }
    }

    /// Lists every project, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fails.
    pub async fn all_projects(&self) -> Result<Vec<Project>, StoreError> {
        let query = Query::table(&self.projects_table)
            .select("id,name")
            .order_asc("name")
            .order_asc("id");
        self.fetcher.all(&query).await
    }

    /// Fetches the given projects.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails.
    pub async fn projects(&self, ids: &[ProjectId]) -> Result<Vec<Project>, StoreError> {
        let keys: Vec<Value> = ids.iter().map(|id| Value::from(id.into_inner())).collect();
        fetch_by_keys(
            &self.fetcher,
            &self.projects_table,
            "id",
            &keys,
            self.chunk_size,
            &["id"],
        )
        .await
    }

    /// Fetches the given categories.
    ///
    /// # Errors
    ///
    /// Returns an error if any request fails.
    pub async fn categories(&self, ids: &[CategoryId]) -> Result<Vec<Category>, StoreError> {
        let keys: Vec<Value> = ids.iter().map(|id| Value::from(id.into_inner())).collect();
        fetch_by_keys(
            &self.fetcher,
            &self.categories_table,
            "id",
            &keys,
            self.chunk_size,
            &["id"],
        )
        .await
    }
}
