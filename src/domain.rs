use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DatasetId {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_identifier(value)
            .map(Self)
            .ok_or_else(|| CatalogError::InvalidDatasetId(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(String);

impl VariableId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VariableId {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_identifier(value)
            .map(Self)
            .ok_or_else(|| CatalogError::InvalidVariableId(value.to_string()))
    }
}

/// Categorical tag shared by variables measuring the same kind of quantity,
/// e.g. `Precipitation` or `Elevation`. Comparison is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableClass(String);

impl VariableClass {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VariableClass {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidVariableClass(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

fn parse_identifier(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let is_valid = !trimmed.is_empty() && !trimmed.chars().any(char::is_whitespace);
    is_valid.then(|| trimmed.to_string())
}

/// Parses a catalog year such as `"0001"`, `"2017"` or `"-500"`.
pub fn parse_year(value: &str) -> Result<i32, CatalogError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| CatalogError::InvalidYear(value.to_string()))
}

/// Leading-integer interpretation of a catalog year: `"0001"` is 1,
/// `"2017 CE"` is 2017, `"n/a"` has no value.
pub fn parse_year_prefix(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let digits_start = usize::from(trimmed.starts_with(['-', '+']));
    let digits_end = trimmed[digits_start..]
        .find(|ch: char| !ch.is_ascii_digit())
        .map_or(trimmed.len(), |offset| digits_start + offset);
    if digits_end == digits_start {
        return None;
    }
    trimmed[..digits_end].parse().ok()
}

/// A period bound exactly as written in the catalog, string or number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogYear(Value);

impl CatalogYear {
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// `None` when the bound is not a year at all.
    pub fn value(&self) -> Option<i32> {
        match &self.0 {
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|year| year.trunc() as i64))
                .and_then(|year| i32::try_from(year).ok()),
            Value::String(text) => parse_year_prefix(text),
            _ => None,
        }
    }
}

impl From<i32> for CatalogYear {
    fn from(year: i32) -> Self {
        Self(Value::from(year))
    }
}

/// Inclusive range of years. Serialized as a `[start, end]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// `[1, <current calendar year>]` according to the local clock.
    pub fn through_current_year() -> Self {
        Self::new(1, chrono::Local::now().year())
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Interval overlap, not containment. An inverted range overlaps nothing.
    pub fn overlaps(&self, other: &YearRange) -> bool {
        if self.is_inverted() {
            return false;
        }
        other.end >= self.start && other.start <= self.end
    }
}

impl From<(i32, i32)> for YearRange {
    fn from((start, end): (i32, i32)) -> Self {
        Self::new(start, end)
    }
}

impl From<YearRange> for (i32, i32) {
    fn from(range: YearRange) -> Self {
        (range.start, range.end)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default)]
    pub gte: CatalogYear,
    #[serde(default)]
    pub lte: CatalogYear,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zero: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timespan {
    pub period: Period,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub class: VariableClass,
    #[serde(default)]
    pub visible: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Variable {
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }
}

/// One catalog entry. Fields the engine does not interpret are kept in
/// `extra` and written back out untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: DatasetId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub timespan: Timespan,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variable: Option<VariableId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Dataset {
    /// `None` when either bound is missing or unparseable; such a dataset
    /// never passes a year filter.
    pub fn span(&self) -> Option<YearRange> {
        let period = &self.timespan.period;
        Some(YearRange::new(period.gte.value()?, period.lte.value()?))
    }

    pub fn time_zero(&self) -> i32 {
        self.timespan.period.time_zero.unwrap_or(0)
    }

    pub fn variable(&self, id: &VariableId) -> Option<&Variable> {
        self.variables.iter().find(|variable| &variable.id == id)
    }

    pub fn variable_mut(&mut self, id: &VariableId) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|variable| &variable.id == id)
    }

    pub fn selected_variable(&self) -> Option<&Variable> {
        self.selected_variable
            .as_ref()
            .and_then(|id| self.variable(id))
    }

    pub fn variable_classes(&self) -> Vec<&VariableClass> {
        let mut classes: Vec<&VariableClass> = Vec::new();
        for variable in &self.variables {
            if !classes.contains(&&variable.class) {
                classes.push(&variable.class);
            }
        }
        classes
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_dataset_id_trims() {
        let id: DatasetId = " lbda ".parse().unwrap();
        assert_eq!(id.as_str(), "lbda");
    }

    #[test]
    fn parse_dataset_id_rejects_whitespace() {
        let err = "paleo car".parse::<DatasetId>().unwrap_err();
        assert_matches!(err, CatalogError::InvalidDatasetId(_));
    }

    #[test]
    fn parse_zero_padded_year() {
        assert_eq!(parse_year("0001").unwrap(), 1);
        assert_eq!(parse_year("-500").unwrap(), -500);
        assert_matches!(parse_year("CE"), Err(CatalogError::InvalidYear(_)));
    }

    #[test]
    fn year_prefix_reads_like_leading_integer() {
        assert_eq!(parse_year_prefix("0001"), Some(1));
        assert_eq!(parse_year_prefix(" 2017 CE"), Some(2017));
        assert_eq!(parse_year_prefix("-500"), Some(-500));
        assert_eq!(parse_year_prefix("n/a"), None);
        assert_eq!(parse_year_prefix("-"), None);
    }

    #[test]
    fn inverted_range_overlaps_nothing() {
        let inverted = YearRange::new(2000, 1990);
        assert!(!inverted.overlaps(&YearRange::new(1, 2017)));
    }
}
