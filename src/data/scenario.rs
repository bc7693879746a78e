//! Battle requests as they arrive from fleet dispatch: JSON with raw string
//! ids and signed counts. Decoding into [BattleInput] is where malformed
//! forces, unknown ids and unknown sector keys are rejected, so the engine
//! only ever sees well-formed input.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::admiral::{Admiral, AdmiralBonus, Admirals};
use crate::combat::battle::BattleInput;
use crate::combat::forces::{ForceSnapshot, ToolCounts, UnitCounts};
use crate::combat::lanes::Lanes;
use crate::combat::report::{default_carry_rate, LootPolicy, Resources};
use crate::combat::structure::Fortifications;
use crate::data::catalog::Catalog;
use crate::error::CatalogError;

/// Units and tools keyed by raw id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawForce {
    #[serde(default)]
    pub units: BTreeMap<String, i64>,
    #[serde(default)]
    pub tools: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttackerRequest {
    #[serde(default)]
    pub admiral: Option<Admiral>,
    /// Waves per sector, in submission order.
    #[serde(default)]
    pub lanes: Lanes<Vec<RawForce>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefenderRequest {
    #[serde(default)]
    pub admiral: Option<Admiral>,
    #[serde(default)]
    pub lanes: Lanes<RawForce>,
    #[serde(default)]
    pub fortifications: Lanes<Fortifications>,
    #[serde(default)]
    pub surface: RawForce,
    #[serde(default)]
    pub stored_resources: Resources,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRequest {
    /// Caller's reference; echoed in logs only.
    #[serde(default)]
    pub battle_id: Option<String>,
    pub attacker: AttackerRequest,
    pub defender: DefenderRequest,
    #[serde(default = "default_carry_rate")]
    pub carry_rate: f64,
}

impl BattleRequest {
    /// Check every id against `catalog` and every count and number for range.
    pub fn into_input(self, catalog: &Catalog) -> Result<BattleInput, CatalogError> {
        let attack = self.attacker.lanes.try_map(|_, waves| {
            waves
                .iter()
                .map(|wave| decode_force(catalog, wave))
                .collect::<Result<Vec<_>, _>>()
        })?;
        let garrisons = self
            .defender
            .lanes
            .try_map(|_, force| decode_force(catalog, force))?;
        let surface_garrison = decode_force(catalog, &self.defender.surface)?;
        // Waves merge on their way to the surface and losses sum across
        // stages, so every per-side total must itself fit a count.
        check_side_totals("attacker", attack.iter().flat_map(|(_, waves)| waves))?;
        check_side_totals(
            "defender",
            garrisons
                .iter()
                .map(|(_, force)| force)
                .chain(std::iter::once(&surface_garrison)),
        )?;

        check_finite("carry_rate", self.carry_rate)?;
        if self.carry_rate < 0.0 {
            return Err(CatalogError::InvalidNumber {
                field: "carry_rate".to_string(),
                value: self.carry_rate,
            });
        }
        for (side, admiral) in [
            ("attacker", &self.attacker.admiral),
            ("defender", &self.defender.admiral),
        ] {
            if let Some(admiral) = admiral {
                check_bonus(side, &admiral.bonus)?;
            }
        }

        Ok(BattleInput {
            attack,
            garrisons,
            fortifications: self.defender.fortifications,
            surface_garrison,
            admirals: Admirals {
                attacker: self.attacker.admiral,
                defender: self.defender.admiral,
            },
            loot: LootPolicy {
                carry_rate: self.carry_rate,
                stored: self.defender.stored_resources,
            },
        })
    }

    pub fn label(&self) -> &str {
        self.battle_id.as_deref().unwrap_or("unnamed")
    }
}

fn decode_force(catalog: &Catalog, raw: &RawForce) -> Result<ForceSnapshot, CatalogError> {
    let mut units = UnitCounts::new();
    for (raw_id, count) in &raw.units {
        let count = check_count(raw_id, *count)?;
        let id = catalog.unit_id(raw_id)?;
        if count > 0 {
            let entry = units.entry(id).or_default();
            *entry = checked_merge(raw_id, *entry, count)?;
        }
    }
    let mut tools = ToolCounts::new();
    for (raw_id, count) in &raw.tools {
        let count = check_count(raw_id, *count)?;
        let id = catalog.tool_id(raw_id)?;
        if count > 0 {
            let entry = tools.entry(id).or_default();
            *entry = checked_merge(raw_id, *entry, count)?;
        }
    }
    Ok(ForceSnapshot { units, tools })
}

/// Two raw keys can normalise to the same id.
fn checked_merge(id: &str, have: u32, add: u32) -> Result<u32, CatalogError> {
    have.checked_add(add).ok_or_else(|| CatalogError::InvalidCount {
        id: id.to_string(),
        count: i64::from(have) + i64::from(add),
    })
}

fn check_side_totals<'a>(
    side: &'static str,
    forces: impl IntoIterator<Item = &'a ForceSnapshot>,
) -> Result<(), CatalogError> {
    let mut units: BTreeMap<&str, u64> = BTreeMap::new();
    let mut tools: BTreeMap<&str, u64> = BTreeMap::new();
    for force in forces {
        for (id, count) in &force.units {
            *units.entry(id.as_str()).or_default() += u64::from(*count);
        }
        for (id, count) in &force.tools {
            *tools.entry(id.as_str()).or_default() += u64::from(*count);
        }
    }
    let limit = u64::from(u32::MAX);
    match units.into_iter().chain(tools).find(|(_, total)| *total > limit) {
        Some((id, total)) => Err(CatalogError::CountOverflow {
            side,
            id: id.to_string(),
            total,
        }),
        None => Ok(()),
    }
}

fn check_count(id: &str, count: i64) -> Result<u32, CatalogError> {
    u32::try_from(count).map_err(|_| CatalogError::InvalidCount {
        id: id.to_string(),
        count,
    })
}

fn check_finite(field: &str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::InvalidNumber {
            field: field.to_string(),
            value,
        })
    }
}

fn check_bonus(side: &str, bonus: &AdmiralBonus) -> Result<(), CatalogError> {
    check_finite(&format!("{side}.admiral.melee_strength_bonus"), bonus.melee_strength_bonus)?;
    check_finite(&format!("{side}.admiral.ranged_strength_bonus"), bonus.ranged_strength_bonus)?;
    check_finite(
        &format!("{side}.admiral.canopy_reduction_bonus"),
        bonus.canopy_reduction_bonus,
    )
}

pub fn parse_battle_request(raw: &str) -> Result<BattleRequest, CatalogError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn load_battle_request(path: impl AsRef<Path>) -> Result<BattleRequest, CatalogError> {
    parse_battle_request(&fs::read_to_string(path)?)
}

/// A JSON array of requests.
pub fn load_battle_requests(path: impl AsRef<Path>) -> Result<Vec<BattleRequest>, CatalogError> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}
