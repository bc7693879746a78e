use thiserror::Error;

use crate::data::catalog::{ToolId, UnitId};

/// Failures while loading a catalog or decoding a battle request against it.
/// All of these are caught before the engine runs.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid id '{0}': expected lowercase ascii letters, digits, '_' or '-'")]
    InvalidId(String),

    #[error("duplicate {kind} id '{id}' in catalog")]
    DuplicateId { kind: &'static str, id: String },

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("count for '{id}' must be between 0 and {max}, got {count}", max = u32::MAX)]
    InvalidCount { id: String, count: i64 },

    #[error("{side} commits {total} of '{id}' in total; at most {max} allowed", max = u32::MAX)]
    CountOverflow {
        side: &'static str,
        id: String,
        total: u64,
    },

    #[error("{field} must be a finite number, got {value}")]
    InvalidNumber { field: String, value: f64 },

    #[error("catalog failed validation with {0} error(s)")]
    Invalid(usize),
}

/// Failures inside the engine. Only reachable when a force references ids
/// missing from the catalog it is resolved against.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("unit '{0}' is not in the catalog")]
    UnknownUnit(UnitId),

    #[error("tool '{0}' is not in the catalog")]
    UnknownTool(ToolId),
}
