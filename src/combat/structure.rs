//! Structural and tool multipliers on the defending side.

use serde::{Deserialize, Serialize};

use crate::combat::admiral::AdmiralBonus;
use crate::combat::forces::ToolCounts;
use crate::data::catalog::{Catalog, DefenseKind};
use crate::error::BattleError;

/// Building levels of one sector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fortifications {
    #[serde(default)]
    pub canopy_level: u32,
    #[serde(default)]
    pub hub_level: u32,
    /// Carried into the report; no effect on resolution.
    #[serde(default)]
    pub minefield_level: u32,
}

/// Everything a wave collision needs to know about a sector besides the forces.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectorDefense {
    pub fortifications: Fortifications,
    pub attacker_admiral: AdmiralBonus,
    pub defender_admiral: AdmiralBonus,
}

/// Resolved multipliers on defense. Melee defense is scaled by
/// `canopy * hub * surface`, ranged defense additionally by `ranged_defense`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StructureBonus {
    pub canopy: f64,
    pub hub: f64,
    pub ranged_defense: f64,
    pub surface: f64,
}

impl StructureBonus {
    pub const NONE: StructureBonus = StructureBonus {
        canopy: 1.0,
        hub: 1.0,
        ranged_defense: 1.0,
        surface: 1.0,
    };

    pub fn melee_multiplier(&self) -> f64 {
        self.canopy * self.hub * self.surface
    }

    pub fn ranged_multiplier(&self) -> f64 {
        self.melee_multiplier() * self.ranged_defense
    }
}

/// Net tool bonus for one defense kind: defender's matching tools minus the
/// attacker's counters of that kind.
pub fn net_tool_bonus(
    catalog: &Catalog,
    kind: DefenseKind,
    defender_tools: &ToolCounts,
    attacker_tools: &ToolCounts,
) -> Result<f64, BattleError> {
    let mut bonus = 0.0;
    for (id, count) in defender_tools {
        let tool = catalog.tool(id)?;
        if !tool.bonus_type.is_offensive() && tool.bonus_type.defense_kind() == kind {
            bonus += f64::from(*count) * tool.bonus_value;
        }
    }
    for (id, count) in attacker_tools {
        let tool = catalog.tool(id)?;
        if tool.bonus_type.is_offensive() && tool.bonus_type.defense_kind() == kind {
            bonus -= f64::from(*count) * tool.bonus_value;
        }
    }
    Ok(bonus)
}

/// Multipliers for a sector garrison. Hub only counts in the center sector;
/// the attacking admiral's canopy reduction scales a positive canopy bonus.
pub fn sector_bonus(
    catalog: &Catalog,
    defense: &SectorDefense,
    is_center: bool,
    defender_tools: &ToolCounts,
    attacker_tools: &ToolCounts,
) -> Result<StructureBonus, BattleError> {
    let rules = catalog.rules();
    let levels = &defense.fortifications;

    let mut canopy = f64::from(levels.canopy_level) * rules.canopy_unit_factor
        + net_tool_bonus(catalog, DefenseKind::Canopy, defender_tools, attacker_tools)?;
    if canopy > 0.0 {
        canopy *= defense.attacker_admiral.canopy_scale();
    }

    let hub = if is_center {
        let bonus = f64::from(levels.hub_level) * rules.hub_unit_factor
            + net_tool_bonus(catalog, DefenseKind::Hub, defender_tools, attacker_tools)?;
        (1.0 + bonus).max(0.0)
    } else {
        1.0
    };

    Ok(StructureBonus {
        canopy: (1.0 + canopy).max(0.0),
        hub,
        ranged_defense: ranged_defense_multiplier(catalog, defender_tools, attacker_tools)?,
        surface: 1.0,
    })
}

/// Multipliers for the surface garrison: no buildings, flat rule bonus.
pub fn surface_bonus(
    catalog: &Catalog,
    defender_tools: &ToolCounts,
    attacker_tools: &ToolCounts,
) -> Result<StructureBonus, BattleError> {
    Ok(StructureBonus {
        surface: (1.0 + catalog.rules().surface_defense_bonus).max(0.0),
        ranged_defense: ranged_defense_multiplier(catalog, defender_tools, attacker_tools)?,
        ..StructureBonus::NONE
    })
}

fn ranged_defense_multiplier(
    catalog: &Catalog,
    defender_tools: &ToolCounts,
    attacker_tools: &ToolCounts,
) -> Result<f64, BattleError> {
    let bonus = net_tool_bonus(
        catalog,
        DefenseKind::RangedDefense,
        defender_tools,
        attacker_tools,
    )?;
    Ok((1.0 + bonus).max(0.0))
}
