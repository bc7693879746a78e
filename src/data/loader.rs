//! Load the unit/tool catalog from YAML. Default location is
//! `data/catalog.yaml` relative to the working directory.

use std::fs;
use std::path::Path;

use crate::data::catalog::{Catalog, CatalogFile};
use crate::error::CatalogError;

pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.yaml";

/// Parse the raw catalog file without building lookup tables, so validation
/// can still see duplicate entries.
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<CatalogFile, CatalogError> {
    let raw = fs::read_to_string(path)?;
    parse_catalog_file(&raw)
}

pub fn parse_catalog_file(raw: &str) -> Result<CatalogFile, CatalogError> {
    Ok(serde_yaml::from_str(raw)?)
}

pub fn catalog_from_yaml_str(raw: &str) -> Result<Catalog, CatalogError> {
    Catalog::from_file(parse_catalog_file(raw)?)
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    Catalog::from_file(load_catalog_file(path)?)
}
