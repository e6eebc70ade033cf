use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, VariableClass, YearRange};

pub const DEFAULT_YEAR_START: i32 = 1;
pub const DEFAULT_YEAR_END: i32 = 2019;

/// User-controlled predicate parameters narrowing the catalog view.
///
/// Replaced wholesale on every update. Missing fields in JSON fall back to
/// the defaults so partial criteria can be written in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub selected_variable_classes: Vec<VariableClass>,
    #[serde(default = "default_year_start")]
    pub year_start: i32,
    #[serde(default = "default_year_end")]
    pub year_end: i32,
    #[serde(default)]
    pub query: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            selected_variable_classes: Vec::new(),
            year_start: DEFAULT_YEAR_START,
            year_end: DEFAULT_YEAR_END,
            query: String::new(),
        }
    }
}

fn default_year_start() -> i32 {
    DEFAULT_YEAR_START
}

fn default_year_end() -> i32 {
    DEFAULT_YEAR_END
}

impl FilterCriteria {
    pub fn year_range(&self) -> YearRange {
        YearRange::new(self.year_start, self.year_end)
    }

    pub fn with_years(mut self, range: YearRange) -> Self {
        self.year_start = range.start;
        self.year_end = range.end;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_classes(mut self, classes: Vec<VariableClass>) -> Self {
        self.selected_variable_classes = classes;
        self
    }

    pub fn matches(&self, dataset: &Dataset) -> bool {
        matches_year_filter(self.year_range(), dataset)
            && matches_query_filter(&self.query, dataset)
            && matches_variable_filter(&self.selected_variable_classes, dataset)
    }
}

pub fn matches_year_filter(range: YearRange, dataset: &Dataset) -> bool {
    dataset.span().is_some_and(|span| range.overlaps(&span))
}

pub fn matches_query_filter(query: &str, dataset: &Dataset) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    dataset.title.to_lowercase().contains(&query)
        || dataset.description.to_lowercase().contains(&query)
}

pub fn matches_variable_filter(classes: &[VariableClass], dataset: &Dataset) -> bool {
    if classes.is_empty() {
        return true;
    }
    dataset
        .variables
        .iter()
        .any(|variable| classes.contains(&variable.class))
}

/// Datasets passing every filter, in catalog order.
pub fn filter_datasets<'a>(datasets: &'a [Dataset], criteria: &FilterCriteria) -> Vec<&'a Dataset> {
    datasets
        .iter()
        .filter(|dataset| criteria.matches(dataset))
        .collect()
}
