//! Dataset catalog filtering and selection engine for a paleoclimate map
//! explorer.

pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod output;
pub mod seed;
pub mod session;
pub mod state;
pub mod store;

pub use error::CatalogError;
pub use store::{CatalogSource, CatalogStore, StaticCatalog};
