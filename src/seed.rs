use crate::domain::Dataset;
use crate::error::CatalogError;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// The datasets shipped with the explorer: LBDA, SRTM and PaleoCAR.
pub fn builtin_catalog() -> Result<Vec<Dataset>, CatalogError> {
    parse_catalog(BUILTIN_CATALOG)
}

/// Parses a catalog document: a JSON array of datasets.
pub fn parse_catalog(content: &str) -> Result<Vec<Dataset>, CatalogError> {
    serde_json::from_str(content).map_err(|err| CatalogError::CatalogParse(err.to_string()))
}
