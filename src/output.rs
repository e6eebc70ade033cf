use std::io::{self, Write};

use serde::Serialize;

use crate::domain::{Dataset, DatasetId, VariableClass, VariableId, YearRange};
use crate::filter::FilterCriteria;
use crate::store::{CatalogSource, CatalogStore};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub criteria: FilterCriteria,
    pub total: usize,
    pub datasets: Vec<ListEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub id: DatasetId,
    pub title: String,
    pub span: Option<YearRange>,
    pub classes: Vec<VariableClass>,
}

impl From<&Dataset> for ListEntry {
    fn from(dataset: &Dataset) -> Self {
        Self {
            id: dataset.id.clone(),
            title: dataset.title.clone(),
            span: dataset.span(),
            classes: dataset.variable_classes().into_iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    pub dataset: Option<DatasetId>,
    pub title: Option<String>,
    pub variable: Option<VariableId>,
    pub visible_variables: Vec<VariableId>,
    pub time_zero: i32,
    pub timespan: YearRange,
}

impl ListResult {
    pub fn from_store<S: CatalogSource>(store: &CatalogStore<S>) -> Self {
        Self {
            criteria: store.filter_criteria().clone(),
            total: store.all().len(),
            datasets: store
                .filtered_datasets()
                .into_iter()
                .map(ListEntry::from)
                .collect(),
        }
    }
}

impl SelectionResult {
    pub fn from_store<S: CatalogSource>(store: &CatalogStore<S>) -> Self {
        let dataset = store.selected_dataset();
        Self {
            dataset: dataset.map(|dataset| dataset.id.clone()),
            title: dataset.map(|dataset| dataset.title.clone()),
            variable: store.selected_variable().map(|variable| variable.id.clone()),
            visible_variables: dataset
                .map(|dataset| {
                    dataset
                        .variables
                        .iter()
                        .filter(|variable| variable.visible)
                        .map(|variable| variable.id.clone())
                        .collect()
                })
                .unwrap_or_default(),
            time_zero: store.selected_dataset_time_zero(),
            timespan: store.selected_dataset_timespan(),
        }
    }
}

impl OutputMode {
    pub fn write_list<W: Write>(self, out: &mut W, result: &ListResult) -> io::Result<()> {
        match self {
            OutputMode::Json => JsonOutput::write_list(out, result),
            OutputMode::Text => TextOutput::write_list(out, result),
        }
    }

    pub fn write_selection<W: Write>(
        self,
        out: &mut W,
        result: &SelectionResult,
    ) -> io::Result<()> {
        match self {
            OutputMode::Json => JsonOutput::write_selection(out, result),
            OutputMode::Text => TextOutput::write_selection(out, result),
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn write_list<W: Write>(out: &mut W, result: &ListResult) -> io::Result<()> {
        Self::write_json(out, result)
    }

    pub fn write_selection<W: Write>(out: &mut W, result: &SelectionResult) -> io::Result<()> {
        Self::write_json(out, result)
    }

    fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        out.write_all(json.as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TextOutput;

impl TextOutput {
    pub fn write_list<W: Write>(out: &mut W, result: &ListResult) -> io::Result<()> {
        for entry in &result.datasets {
            let classes = entry
                .classes
                .iter()
                .map(VariableClass::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            let span = entry
                .span
                .map_or_else(|| "?".to_string(), |span| span.to_string());
            writeln!(
                out,
                "{:<10} {:>11}  {}  [{}]",
                entry.id.as_str(),
                span,
                entry.title,
                classes
            )?;
        }
        writeln!(
            out,
            "{} of {} datasets match",
            result.datasets.len(),
            result.total
        )
    }

    pub fn write_selection<W: Write>(out: &mut W, result: &SelectionResult) -> io::Result<()> {
        match (&result.dataset, &result.title) {
            (Some(id), Some(title)) => writeln!(out, "dataset:  {id} ({title})")?,
            _ => writeln!(out, "dataset:  none")?,
        }
        match &result.variable {
            Some(variable) => writeln!(out, "variable: {variable}")?,
            None => writeln!(out, "variable: none")?,
        }
        writeln!(out, "timespan: {}", result.timespan)?;
        writeln!(out, "timezero: {}", result.time_zero)
    }
}
