use tracing::debug;

use crate::domain::{Dataset, DatasetId, Variable, VariableId, YearRange};
use crate::filter::{FilterCriteria, filter_datasets};

/// Everything the explorer knows about the catalog at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub loading: bool,
    pub all: Vec<Dataset>,
    pub selected_dataset: Option<DatasetId>,
    pub filter_criteria: FilterCriteria,
}

/// A state transition requested by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    BeginLoad,
    Load(Vec<Dataset>),
    SetFilterCriteria(FilterCriteria),
    SelectDataset(DatasetId),
    ClearSelection,
    SelectVariable(VariableId),
}

pub fn reduce(mut state: CatalogState, command: Command) -> CatalogState {
    match command {
        Command::BeginLoad => {
            state.loading = true;
        }
        Command::Load(datasets) => {
            state.all = datasets;
            state.loading = false;
        }
        Command::SetFilterCriteria(criteria) => {
            state.filter_criteria = criteria;
        }
        Command::SelectDataset(id) => {
            let found = state.all.iter().any(|dataset| dataset.id == id);
            if !found {
                debug!(dataset = %id, "dataset not in catalog - clearing selection");
            }
            state.selected_dataset = found.then_some(id);
        }
        Command::ClearSelection => {
            state.selected_dataset = None;
        }
        Command::SelectVariable(id) => {
            let Some(selected) = state.selected_dataset.clone() else {
                debug!(variable = %id, "no dataset selected - ignoring variable selection");
                return state;
            };
            let Some(dataset) = state.all.iter_mut().find(|dataset| dataset.id == selected)
            else {
                return state;
            };
            match dataset.variable_mut(&id) {
                Some(variable) => {
                    variable.visible = true;
                    dataset.selected_variable = Some(id);
                }
                None => {
                    debug!(dataset = %selected, variable = %id, "variable not in dataset - ignoring");
                }
            }
        }
    }
    state
}

impl CatalogState {
    pub fn is_loaded(&self) -> bool {
        !self.all.is_empty()
    }

    pub fn filtered_datasets(&self) -> Vec<&Dataset> {
        filter_datasets(&self.all, &self.filter_criteria)
    }

    /// "Nothing selected" and "selected id no longer in the catalog" look
    /// the same to callers.
    pub fn selected_dataset(&self) -> Option<&Dataset> {
        let id = self.selected_dataset.as_ref()?;
        self.all.iter().find(|dataset| &dataset.id == id)
    }

    pub fn selected_variable(&self) -> Option<&Variable> {
        self.selected_dataset()?.selected_variable()
    }

    pub fn selected_dataset_time_zero(&self) -> i32 {
        self.selected_dataset()
            .map(Dataset::time_zero)
            .unwrap_or(0)
    }

    pub fn selected_dataset_timespan(&self, fallback: YearRange) -> YearRange {
        match self.selected_dataset().and_then(Dataset::span) {
            Some(span) => span,
            None => {
                debug!(%fallback, "no selected dataset timespan - returning default year range");
                fallback
            }
        }
    }
}
