pub mod admiral;
pub mod apportion;
pub mod battle;
pub mod collision;
pub mod export_csv;
pub mod forces;
pub mod lanes;
pub mod power;
pub mod report;
pub mod sector;
pub mod structure;

pub use admiral::{Admiral, AdmiralBonus, Admirals};
pub use apportion::apportion;
pub use battle::{resolve_battle, BattleInput, BattleOutcome, StrengthMultipliers, SurfaceResult};
pub use collision::{clash, resolve_wave_collision, Side, WaveResult};
pub use export_csv::{report_csv_string, write_report_csv};
pub use forces::{ForceSnapshot, ToolCounts, UnitCounts};
pub use lanes::{Lanes, Sector};
pub use power::{compute_power, dominant_class, weighted_defense, Role, SidePower};
pub use report::{
    assemble_report, resolve_report, BattleReport, LootPolicy, ReportView, Resources,
};
pub use sector::{resolve_sector, SectorResult};
pub use structure::{sector_bonus, surface_bonus, Fortifications, SectorDefense, StructureBonus};
