//! Startup-loaded catalog shared across worker threads.
//! Load once, validate, and hand out an `Arc<Catalog>`; nothing reloads it per battle.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data::catalog::Catalog;
use crate::data::loader::{load_catalog_file, DEFAULT_CATALOG_PATH};
use crate::data::validate::{validate_catalog_file, ValidationSeverity};
use crate::error::CatalogError;

/// Overrides [DEFAULT_CATALOG_PATH] when set.
pub const CATALOG_PATH_ENV: &str = "SIEGELINE_CATALOG";

/// Explicit path wins, then `SIEGELINE_CATALOG`, then the default.
pub fn resolve_catalog_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return PathBuf::from(path);
    }
    env::var(CATALOG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CATALOG_PATH))
}

/// Load and validate the catalog. Validation errors refuse the catalog;
/// warnings are logged and the catalog is accepted.
pub fn load_shared_catalog(path: &Path) -> Result<Arc<Catalog>, CatalogError> {
    let file = load_catalog_file(path)?;
    let report = validate_catalog_file(&file);
    for diag in &report.diagnostics {
        match diag.severity {
            ValidationSeverity::Error => tracing::error!(path = %path.display(), "{diag}"),
            ValidationSeverity::Warning => tracing::warn!(path = %path.display(), "{diag}"),
            ValidationSeverity::Info => tracing::debug!(path = %path.display(), "{diag}"),
        }
    }
    if report.has_errors() {
        return Err(CatalogError::Invalid(report.error_count()));
    }

    let catalog = Catalog::from_file(file)?;
    tracing::info!(
        path = %path.display(),
        units = catalog.units().count(),
        tools = catalog.tools().count(),
        data_version = catalog.data_version().unwrap_or("unversioned"),
        "catalog loaded"
    );
    Ok(Arc::new(catalog))
}
