use std::fs;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::YearRange;
use crate::error::CatalogError;
use crate::filter::FilterCriteria;
use crate::seed::parse_catalog;
use crate::store::StaticCatalog;

pub const CONFIG_FILE_NAME: &str = "skope-catalog.json";
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub catalog: Option<Utf8PathBuf>,
    #[serde(default)]
    pub filter: Option<FilterCriteria>,
    #[serde(default)]
    pub default_span: Option<YearRange>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub catalog: Option<Utf8PathBuf>,
    pub filter: FilterCriteria,
    pub default_span: YearRange,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            catalog: None,
            filter: FilterCriteria::default(),
            default_span: YearRange::through_current_year(),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads the config at `path`, or searches the working directory and
    /// then the user config directory when no path is given.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, CatalogError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => Self::discover().ok_or(CatalogError::MissingConfig)?,
        };

        let content = fs::read_to_string(&config_path)
            .map_err(|_| CatalogError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| CatalogError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, CatalogError> {
        let schema_version = config.schema_version.unwrap_or(SCHEMA_VERSION);
        if schema_version != SCHEMA_VERSION {
            return Err(CatalogError::UnsupportedSchema(schema_version));
        }

        let default_span = config
            .default_span
            .unwrap_or_else(YearRange::through_current_year);
        if default_span.is_inverted() {
            return Err(CatalogError::InvalidYearRange {
                start: default_span.start,
                end: default_span.end,
            });
        }

        Ok(ResolvedConfig {
            schema_version,
            catalog: config.catalog,
            filter: config.filter.unwrap_or_default(),
            default_span,
        })
    }

    pub fn load_catalog(path: &Utf8Path) -> Result<StaticCatalog, CatalogError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| CatalogError::CatalogRead(path.as_std_path().to_path_buf()))?;
        Ok(StaticCatalog::new(parse_catalog(&content)?))
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        user_config_path().filter(|path| path.exists())
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "skope-catalog").map(|dirs| dirs.config_dir().join("config.json"))
}
