//! One attacking wave against one garrison.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::admiral::AdmiralBonus;
use crate::combat::apportion::apportion;
use crate::combat::forces::{total_units, ForceSnapshot, UnitCounts};
use crate::combat::power::{compute_power, dominant_class, weighted_defense, Role};
use crate::combat::structure::{sector_bonus, SectorDefense, StructureBonus};
use crate::data::catalog::Catalog;
use crate::error::BattleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Attacker => "attacker",
            Side::Defender => "defender",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveResult {
    pub winner: Side,
    /// Pre-battle counts.
    pub attacker_units: UnitCounts,
    pub defender_units: UnitCounts,
    pub attacker_losses: UnitCounts,
    pub defender_losses: UnitCounts,
    pub attacker_triangle_bonus: f64,
    pub defender_triangle_bonus: f64,
    /// Scalar powers that were compared.
    pub attacker_power: f64,
    pub defender_power: f64,
    /// Structural and tool multipliers on the defense; all 1.0 when unopposed.
    pub structure: StructureBonus,
    pub unopposed: bool,
}

impl WaveResult {
    fn walkover(attacker_units: UnitCounts, attacker_power: f64) -> Self {
        Self {
            winner: Side::Attacker,
            attacker_units,
            defender_units: UnitCounts::new(),
            attacker_losses: UnitCounts::new(),
            defender_losses: UnitCounts::new(),
            attacker_triangle_bonus: 1.0,
            defender_triangle_bonus: 1.0,
            attacker_power,
            defender_power: 0.0,
            structure: StructureBonus::NONE,
            unopposed: true,
        }
    }
}

/// Resolve a wave against a sector garrison.
///
/// An empty garrison is unopposed: the attacker wins without losses on
/// either side. Otherwise the side with strictly greater power wins, exact
/// ties going to the defender.
pub fn resolve_wave_collision(
    catalog: &Catalog,
    attacker: &ForceSnapshot,
    defender: &ForceSnapshot,
    defense: &SectorDefense,
    is_center: bool,
) -> Result<WaveResult, BattleError> {
    let structure = sector_bonus(catalog, defense, is_center, &defender.tools, &attacker.tools)?;
    clash(
        catalog,
        attacker,
        defender,
        &structure,
        &defense.attacker_admiral,
        &defense.defender_admiral,
    )
}

/// Core collision with the defender's multipliers already resolved. Shared
/// by sector waves and the surface stage.
pub fn clash(
    catalog: &Catalog,
    attacker: &ForceSnapshot,
    defender: &ForceSnapshot,
    structure: &StructureBonus,
    attacker_admiral: &AdmiralBonus,
    defender_admiral: &AdmiralBonus,
) -> Result<WaveResult, BattleError> {
    let defender_class = dominant_class(catalog, &defender.units)?;
    let attack = compute_power(
        catalog,
        &attacker.units,
        Role::Attack,
        defender_class,
        &StructureBonus::NONE,
        attacker_admiral,
    )?;

    if defender.is_empty() {
        return Ok(WaveResult::walkover(attacker.units.clone(), attack.total()));
    }

    let attacker_class = dominant_class(catalog, &attacker.units)?;
    let defense = compute_power(
        catalog,
        &defender.units,
        Role::Defense,
        attacker_class,
        structure,
        defender_admiral,
    )?;

    let attacker_power = attack.total();
    let defender_power = weighted_defense(&defense, &attack);
    let exponent = catalog.rules().loss_exponent;

    let (winner, attacker_losses, defender_losses) = if attacker_power > defender_power {
        (
            Side::Attacker,
            winner_losses(&attacker.units, defender_power, attacker_power, exponent),
            wipe(&defender.units),
        )
    } else if attacker_power == 0.0 && defender_power == 0.0 {
        (Side::Defender, UnitCounts::new(), UnitCounts::new())
    } else {
        (
            Side::Defender,
            wipe(&attacker.units),
            winner_losses(&defender.units, attacker_power, defender_power, exponent),
        )
    };

    Ok(WaveResult {
        winner,
        attacker_units: attacker.units.clone(),
        defender_units: defender.units.clone(),
        attacker_losses,
        defender_losses,
        attacker_triangle_bonus: attack.triangle_bonus,
        defender_triangle_bonus: defense.triangle_bonus,
        attacker_power,
        defender_power,
        structure: *structure,
        unopposed: false,
    })
}

fn wipe(units: &UnitCounts) -> UnitCounts {
    units
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(id, count)| (id.clone(), *count))
        .collect()
}

/// `floor(total * (loser / winner)^exponent)` units, split by count share.
fn winner_losses(
    units: &UnitCounts,
    loser_power: f64,
    winner_power: f64,
    exponent: f64,
) -> UnitCounts {
    if loser_power <= 0.0 || winner_power <= 0.0 {
        return UnitCounts::new();
    }
    let ratio = (loser_power / winner_power).clamp(0.0, 1.0).powf(exponent);
    let total = total_units(units);
    let lost = ((total as f64) * ratio).floor().clamp(0.0, total as f64) as u64;

    let shares: BTreeMap<_, u64> = units
        .iter()
        .map(|(id, count)| (id.clone(), u64::from(*count)))
        .collect();
    apportion(&shares, lost)
        .into_iter()
        .map(|(id, lost)| (id, u32::try_from(lost).unwrap_or(u32::MAX)))
        .collect()
}
