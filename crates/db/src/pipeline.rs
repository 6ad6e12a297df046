//! Report pipeline: fetch stages feeding the reconciler.

use std::collections::BTreeSet;

use fluxo_core::reconcile::{
    DisplayRow, JoinDepth, ReconcileInput, ReconcileOptions, Reconciler, ViewKind,
};
use fluxo_core::session::{Generation, Publish, ReportSession};
use fluxo_shared::config::TableNames;
use fluxo_shared::types::{CategoryId, ProjectId};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::repositories::{
    InvoiceRepository, LineItemRepository, LookupRepository, MovementRepository,
};
use crate::store::{Fetcher, StoreError};

/// Pipeline stage, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Movement fetch.
    Movements,
    /// Invoice header fetch.
    Invoices,
    /// Line item fetch.
    LineItems,
    /// Project lookup.
    Projects,
    /// Category lookup.
    Categories,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Movements => "movements",
            Self::Invoices => "invoices",
            Self::LineItems => "line items",
            Self::Projects => "projects",
            Self::Categories => "categories",
        })
    }
}

/// A failed pipeline stage.
#[derive(Debug, Error)]
#[error("Failed to fetch {stage}: {source}")]
pub struct PipelineError {
    /// Stage that failed.
    pub stage: Stage,
    /// Store error.
    #[source]
    pub source: StoreError,
}

/// Result of a generation-guarded refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh<T> {
    /// The rows became the session's current state.
    Applied {
        /// Generation of this refresh.
        generation: Generation,
        /// Rows as applied.
        rows: Vec<T>,
    },
    /// A newer refresh started first; nothing was applied.
    Superseded {
        /// Generation of this refresh.
        generation: Generation,
    },
}

fn stage<T>(stage: Stage, result: Result<T, StoreError>) -> Result<T, PipelineError> {
    result.map_err(|source| {
        error!(stage = %stage, error = %source, "Report pipeline stage failed");
        PipelineError { stage, source }
    })
}

/// Runs the fetch stages for one reconciliation.
#[derive(Debug, Clone)]
pub struct ReportPipeline {
    movements: MovementRepository,
    invoices: InvoiceRepository,
    line_items: LineItemRepository,
    lookups: LookupRepository,
}

impl ReportPipeline {
    /// Creates a pipeline over `fetcher`.
    pub fn new(fetcher: &Fetcher, tables: &TableNames, chunk_size: usize) -> Self {
        Self {
            movements: MovementRepository::new(fetcher.clone(), &tables.movements),
            invoices: InvoiceRepository::new(fetcher.clone(), &tables.invoices, chunk_size),
            line_items: LineItemRepository::new(fetcher.clone(), &tables.line_items, chunk_size),
            lookups: LookupRepository::new(
                fetcher.clone(),
                &tables.projects,
                &tables.categories,
                chunk_size,
            ),
        }
    }

    /// Lookup repository, for the project filter bar.
    pub const fn lookups(&self) -> &LookupRepository {
        &self.lookups
    }

    /// Fetches every record set the reconciliation needs.
    ///
    /// Stages run one after another; the first failure aborts.
    ///
    /// # Errors
    ///
    /// Returns the failing stage and its store error.
    pub async fn load(&self, options: &ReconcileOptions) -> Result<ReconcileInput, PipelineError> {
        // A header's project can satisfy the filter, so the store may only
        // narrow by project when headers are not joined.
        let store_project = options.project.filter(|_| options.join == JoinDepth::None);
        let movements = stage(
            Stage::Movements,
            self.movements
                .in_window(&options.window, store_project)
                .await,
        )?;

        let keys: Vec<String> = movements
            .iter()
            .filter_map(|m| m.invoice_key())
            .filter(|key| {
                options
                    .invoice_key
                    .as_deref()
                    .is_none_or(|wanted| wanted.trim() == *key)
            })
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let joins = options.join != JoinDepth::None && !keys.is_empty();
        let invoices = if joins {
            stage(Stage::Invoices, self.invoices.by_keys(&keys).await)?
        } else {
            Vec::new()
        };
        let line_items = if joins && options.join == JoinDepth::LineItems {
            stage(Stage::LineItems, self.line_items.by_keys(&keys).await)?
        } else {
            Vec::new()
        };

        let project_ids: Vec<ProjectId> = movements
            .iter()
            .filter_map(|m| m.project_id)
            .chain(invoices.iter().filter_map(|i| i.project_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let projects = stage(Stage::Projects, self.lookups.projects(&project_ids).await)?;

        let category_ids: Vec<CategoryId> = movements
            .iter()
            .filter_map(|m| m.category_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let categories = stage(
            Stage::Categories,
            self.lookups.categories(&category_ids).await,
        )?;

        debug!(
            movements = movements.len(),
            invoices = invoices.len(),
            line_items = line_items.len(),
            projects = projects.len(),
            categories = categories.len(),
            "Report inputs loaded"
        );

        Ok(ReconcileInput {
            movements,
            invoices,
            line_items,
            projects,
            categories,
        })
    }

    /// Loads and reconciles.
    ///
    /// # Errors
    ///
    /// Returns the failing stage and its store error.
    pub async fn run(&self, options: &ReconcileOptions) -> Result<Vec<DisplayRow>, PipelineError> {
        let input = self.load(options).await?;
        let rows = Reconciler::reconcile(options, &input);
        info!(
            start = %options.window.start(),
            end = %options.window.end(),
            rows = rows.len(),
            "Report reconciled"
        );
        Ok(rows)
    }

    /// Runs `view` under a new generation and publishes the result to the
    /// session unless a newer refresh of the same view started meanwhile.
    ///
    /// # Errors
    ///
    /// Returns the pipeline error. It is recorded on the view when this
    /// refresh is still the newest.
    pub async fn refresh_view(
        &self,
        session: &ReportSession,
        view: ViewKind,
        options: &ReconcileOptions,
    ) -> Result<Refresh<DisplayRow>, PipelineError> {
        let state = session.view(view);
        let generation = state.begin();
        debug!(view = %view, generation = %generation, "View refresh started");

        match self.run(options).await {
            Ok(rows) => match state.publish(generation, Ok(rows.clone())) {
                Publish::Applied => Ok(Refresh::Applied { generation, rows }),
                Publish::Stale => {
                    warn!(view = %view, generation = %generation, "Discarding superseded result");
                    Ok(Refresh::Superseded { generation })
                }
            },
            Err(e) => {
                state.publish(generation, Err(e.to_string()));
                Err(e)
            }
        }
    }
}
