use tracing::{debug, info};

use crate::domain::{Dataset, DatasetId, Variable, VariableId, YearRange};
use crate::error::CatalogError;
use crate::filter::FilterCriteria;
use crate::seed::builtin_catalog;
use crate::state::{CatalogState, Command, reduce};

/// Supplies the raw catalog. Called at most once per store unless the
/// store is rebuilt.
pub trait CatalogSource {
    fn datasets(&self) -> Vec<Dataset>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    datasets: Vec<Dataset>,
}

impl StaticCatalog {
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self { datasets }
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(Self::new(builtin_catalog()?))
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl CatalogSource for StaticCatalog {
    fn datasets(&self) -> Vec<Dataset> {
        self.datasets.clone()
    }
}

/// Owns the catalog state for one explorer session.
///
/// Every mutation goes through [`reduce`]; the read accessors are
/// recomputed from the current state on each call.
#[derive(Debug)]
pub struct CatalogStore<S: CatalogSource> {
    source: S,
    state: CatalogState,
    fallback_span: YearRange,
}

impl<S: CatalogSource> CatalogStore<S> {
    /// The fallback timespan is `[1, current year]`, read from the clock once.
    pub fn new(source: S) -> Self {
        Self::with_fallback_span(source, YearRange::through_current_year())
    }

    pub fn with_fallback_span(source: S, fallback_span: YearRange) -> Self {
        Self {
            source,
            state: CatalogState::default(),
            fallback_span,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn apply(&mut self, command: Command) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, command);
    }

    /// Populates the catalog once. Later calls are ignored.
    pub fn load(&mut self) {
        if self.state.loading {
            debug!("already loading - ignoring request");
            return;
        }
        if self.state.is_loaded() {
            debug!("catalog already loaded - ignoring request");
            return;
        }
        self.apply(Command::BeginLoad);
        let datasets = self.source.datasets();
        info!(datasets = datasets.len(), "catalog loaded");
        self.apply(Command::Load(datasets));
    }

    pub fn set_filter_criteria(&mut self, criteria: FilterCriteria) {
        self.apply(Command::SetFilterCriteria(criteria));
    }

    pub fn select_dataset(&mut self, id: DatasetId) {
        self.apply(Command::SelectDataset(id));
    }

    pub fn clear_selection(&mut self) {
        self.apply(Command::ClearSelection);
    }

    /// Loads the catalog if needed and selects `id`, unless it is already
    /// the current selection.
    pub fn load_dataset(&mut self, id: DatasetId) {
        if self.state.selected_dataset.as_ref() == Some(&id) {
            debug!(dataset = %id, "dataset already selected");
            return;
        }
        if !self.state.is_loaded() {
            self.load();
        }
        self.select_dataset(id);
    }

    /// No-op when no dataset is selected or the id is unknown.
    pub fn select_variable(&mut self, id: VariableId) {
        self.apply(Command::SelectVariable(id));
    }

    pub fn load_and_select_variable(&mut self, id: VariableId) {
        if !self.state.is_loaded() {
            self.load();
        }
        if self.state.selected_dataset.is_some() {
            self.select_variable(id);
        }
    }

    pub fn loading(&self) -> bool {
        self.state.loading
    }

    pub fn filter_criteria(&self) -> &FilterCriteria {
        &self.state.filter_criteria
    }

    pub fn all(&self) -> &[Dataset] {
        &self.state.all
    }

    pub fn filtered_datasets(&self) -> Vec<&Dataset> {
        self.state.filtered_datasets()
    }

    pub fn selected_dataset(&self) -> Option<&Dataset> {
        self.state.selected_dataset()
    }

    pub fn selected_variable(&self) -> Option<&Variable> {
        self.state.selected_variable()
    }

    pub fn selected_dataset_time_zero(&self) -> i32 {
        self.state.selected_dataset_time_zero()
    }

    pub fn selected_dataset_timespan(&self) -> YearRange {
        self.state.selected_dataset_timespan(self.fallback_span)
    }
}
