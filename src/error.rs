use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("invalid dataset id: {0:?}")]
    InvalidDatasetId(String),

    #[error("invalid variable id: {0:?}")]
    InvalidVariableId(String),

    #[error("invalid variable class: {0:?}")]
    InvalidVariableClass(String),

    #[error("invalid year: {0:?}")]
    InvalidYear(String),

    #[error("invalid year range: {start}..={end}")]
    #[diagnostic(help("the start year must not be after the end year"))]
    InvalidYearRange { start: i32, end: i32 },

    #[error("missing config file skope-catalog.json")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("unsupported config schema version: {0}")]
    UnsupportedSchema(u32),

    #[error("failed to read catalog file at {0}")]
    CatalogRead(PathBuf),

    #[error("failed to parse catalog: {0}")]
    CatalogParse(String),

    #[error("dataset not found in catalog: {0}")]
    DatasetNotFound(String),

    #[error("variable {variable} not found in dataset {dataset}")]
    VariableNotFound { dataset: String, variable: String },

    #[error("no dataset selected")]
    #[diagnostic(help("select a dataset before selecting one of its variables"))]
    NoDatasetSelected,

    #[error("invalid command: {0}")]
    InvalidCommand(String),
}
