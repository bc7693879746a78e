pub mod catalog;
pub mod loader;
pub mod registry;
pub mod scenario;
pub mod validate;

pub use catalog::{
    Advantage, BonusType, Catalog, CatalogFile, CombatRules, DefenseKind, ToolId, ToolStat,
    UnitClass, UnitId, UnitStat,
};
pub use loader::{
    catalog_from_yaml_str, load_catalog, load_catalog_file, parse_catalog_file,
    DEFAULT_CATALOG_PATH,
};
pub use registry::{load_shared_catalog, resolve_catalog_path, CATALOG_PATH_ENV};
pub use scenario::{
    load_battle_request, load_battle_requests, parse_battle_request, BattleRequest, RawForce,
};
pub use validate::{
    validate_catalog_file, ValidationDiagnostic, ValidationReport, ValidationSeverity,
};
