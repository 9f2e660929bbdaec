//! In-memory dataset store.
//!
//! The store owns one immutable `Dataset` snapshot behind an `ArcSwap`.
//! Readers grab an `Arc<Dataset>` without locking and keep a complete view
//! for as long as they hold it; `load()` builds a fresh snapshot and swaps
//! the pointer in one step, so nobody ever sees a half-populated dataset.
//!
//! Loading fails open: an unreadable or malformed source is logged and
//! leaves the store empty rather than surfacing an error to readers.

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexSet;

use crate::domain::{DEFAULT_DATE_COLUMN, Observation};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_wide_csv};

/// Where observations come from.
pub trait ObservationSource: Send + Sync {
    /// Human-readable description for logs.
    fn describe(&self) -> String;

    /// Read the whole table.
    fn fetch(&self) -> Result<IngestedData, AppError>;
}

/// A wide CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
    pub date_column: String,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
        }
    }

    pub fn with_date_column(mut self, date_column: impl Into<String>) -> Self {
        self.date_column = date_column.into();
        self
    }
}

impl ObservationSource for CsvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<IngestedData, AppError> {
        load_wide_csv(&self.path, &self.date_column)
    }
}

/// One immutable snapshot of the dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct product names in first-seen order.
    pub fn products(&self) -> Vec<String> {
        let names: IndexSet<&str> = self.observations.iter().map(|o| o.product.as_str()).collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Case-insensitive substring search over product, date label, and the
    /// sales cell as written in the source.
    ///
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Observation> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.observations.iter().collect();
        }
        self.observations
            .iter()
            .filter(|o| {
                o.product.to_lowercase().contains(&needle)
                    || o.date.to_lowercase().contains(&needle)
                    || o.cell.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// What happened during a `load()`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub observations: usize,
    pub skipped_rows: usize,
    /// Set when the source could not be read; the store is empty in that case.
    pub error: Option<String>,
}

impl LoadReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Holds the current dataset snapshot and knows how to rebuild it.
pub struct DatasetStore {
    source: Box<dyn ObservationSource>,
    current: ArcSwap<Dataset>,
}

impl DatasetStore {
    /// Create an empty store; call `load()` to populate it.
    pub fn new(source: impl ObservationSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            current: ArcSwap::from_pointee(Dataset::default()),
        }
    }

    /// Create a store and load it immediately.
    pub fn open(source: impl ObservationSource + 'static) -> (Self, LoadReport) {
        let store = Self::new(source);
        let report = store.load();
        (store, report)
    }

    /// Replace the whole snapshot from the source.
    pub fn load(&self) -> LoadReport {
        let origin = self.source.describe();
        match self.source.fetch() {
            Ok(data) => {
                let report = LoadReport {
                    rows_read: data.rows_read,
                    observations: data.observations.len(),
                    skipped_rows: data.row_errors.len(),
                    error: None,
                };
                for err in &data.row_errors {
                    tracing::debug!(line = err.line, "{}", err.message);
                }
                self.current.store(Arc::new(Dataset::new(data.observations)));
                tracing::info!(
                    source = %origin,
                    rows = report.rows_read,
                    observations = report.observations,
                    "dataset loaded"
                );
                report
            }
            Err(err) => {
                self.current.store(Arc::new(Dataset::default()));
                tracing::error!(source = %origin, "failed to load dataset: {err}");
                LoadReport {
                    rows_read: 0,
                    observations: 0,
                    skipped_rows: 0,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// The current snapshot. Callers share it read-only.
    pub fn get_all(&self) -> Arc<Dataset> {
        self.current.load_full()
    }

    /// Distinct product names in the current snapshot, first-seen order.
    pub fn products(&self) -> Vec<String> {
        self.get_all().products()
    }

    /// Observations matching `query` in the current snapshot.
    pub fn search(&self, query: &str) -> Vec<Observation> {
        self.get_all().search(query).into_iter().cloned().collect()
    }
}

impl std::fmt::Debug for DatasetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetStore")
            .field("source", &self.source.describe())
            .field("observations", &self.current.load().len())
            .finish()
    }
}
