use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::analytics::report::Report;
use crate::data::cache;
use crate::data::filter::{filtered_indices, FilterField, FilterState};
use crate::data::model::{Transaction, TransactionSet};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded). Shared with the
    /// process-wide cache, never mutated.
    pub dataset: Option<Arc<TransactionSet>>,

    /// Where the dataset came from, for reloads.
    pub source_path: Option<PathBuf>,

    /// Multi-select filters over country and product category.
    pub filters: FilterState,

    /// Indices of transactions passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates over the visible rows, recomputed on filter change.
    pub report: Option<Report>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            source_path: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            report: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Load a transactions file through the shared cache.
    pub fn load_path(&mut self, path: &Path) {
        self.loading = true;
        match cache::shared().load(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} transactions from {} ({} malformed rows dropped)",
                    dataset.len(),
                    path.display(),
                    dataset.dropped_rows
                );
                self.set_dataset(dataset, path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                self.loading = false;
            }
        }
    }

    /// Re-read the current source file, bypassing the cache.
    pub fn reload(&mut self) {
        if let Some(path) = self.source_path.clone() {
            cache::shared().invalidate(&path);
            self.load_path(&path);
        }
    }

    /// Ingest a newly loaded dataset and reset filters.
    pub fn set_dataset(&mut self, dataset: Arc<TransactionSet>, path: PathBuf) {
        self.filters = FilterState::default();
        self.dataset = Some(dataset);
        self.source_path = Some(path);
        self.status_message = None;
        self.loading = false;
        self.refilter();
    }

    /// Recompute `visible_indices` and the report after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let indices = filtered_indices(ds, &self.filters);
            log::debug!("Filter pass kept {} of {} rows", indices.len(), ds.len());
            let rows: Vec<&Transaction> = indices.iter().map(|&i| &ds.transactions[i]).collect();
            self.report = Some(Report::compute(&rows));
            self.visible_indices = indices;
        }
    }

    /// Toggle a single value in a field's filter.
    pub fn toggle_filter_value(&mut self, field: FilterField, value: &str) {
        let selected = self.filters.selection_mut(field);
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every value occurring in a field.
    pub fn select_all(&mut self, field: FilterField) {
        if let Some(ds) = &self.dataset {
            let values = match field {
                FilterField::Country => ds.countries.clone(),
                FilterField::Category => ds.categories.clone(),
            };
            *self.filters.selection_mut(field) = values;
            self.refilter();
        }
    }

    /// Clear a field's filter, removing its restriction.
    pub fn select_none(&mut self, field: FilterField) {
        self.filters.selection_mut(field).clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testutil::worked_example;

    fn loaded_state() -> AppState {
        let dataset = Arc::new(TransactionSet::from_transactions(worked_example(), 0));
        let mut state = AppState::default();
        state.set_dataset(dataset, PathBuf::from("fixture.csv"));
        state
    }

    #[test]
    fn ingesting_a_dataset_reports_everything() {
        let state = loaded_state();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        let report = state.report.as_ref().unwrap();
        assert_eq!(report.summary.total_revenue, 350.0);
        assert!(state.filters.is_unrestricted());
    }

    #[test]
    fn toggling_a_value_refilters_and_back() {
        let mut state = loaded_state();

        state.toggle_filter_value(FilterField::Country, "UK");
        assert_eq!(state.visible_indices, vec![2]);
        assert_eq!(state.report.as_ref().unwrap().summary.total_revenue, 200.0);

        state.toggle_filter_value(FilterField::Country, "UK");
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.report.as_ref().unwrap().summary.total_revenue, 350.0);
    }

    #[test]
    fn select_all_and_none_keep_every_row_visible() {
        let mut state = loaded_state();

        state.select_all(FilterField::Country);
        assert_eq!(state.filters.countries.len(), 2);
        assert_eq!(state.visible_indices.len(), 3);

        state.select_none(FilterField::Country);
        assert!(state.filters.countries.is_empty());
        assert_eq!(state.visible_indices.len(), 3);
    }
}
