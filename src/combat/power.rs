//! Force aggregation: unit counts to effective melee/ranged power.

use serde::Serialize;

use crate::combat::admiral::AdmiralBonus;
use crate::combat::forces::UnitCounts;
use crate::combat::structure::StructureBonus;
use crate::data::catalog::{Catalog, UnitClass};
use crate::error::BattleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Attack,
    Defense,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SidePower {
    pub melee: f64,
    pub ranged: f64,
    /// Effective triangle multiplier over the whole force: boosted base
    /// power divided by plain base power, 1.0 when nothing was boosted.
    pub triangle_bonus: f64,
}

impl SidePower {
    pub fn total(&self) -> f64 {
        self.melee + self.ranged
    }
}

/// Class with the most units; ties go to the earlier class. `None` for an
/// empty force.
pub fn dominant_class(catalog: &Catalog, units: &UnitCounts) -> Result<Option<UnitClass>, BattleError> {
    let mut counts = [0u64; 3];
    for (id, count) in units {
        let stat = catalog.unit(id)?;
        counts[class_index(stat.class)] += u64::from(*count);
    }
    let mut best: Option<(UnitClass, u64)> = None;
    for class in [UnitClass::Melee, UnitClass::Ranged, UnitClass::Robotic] {
        let count = counts[class_index(class)];
        if count > 0 && best.map_or(true, |(_, top)| count > top) {
            best = Some((class, count));
        }
    }
    Ok(best.map(|(class, _)| class))
}

fn class_index(class: UnitClass) -> usize {
    match class {
        UnitClass::Melee => 0,
        UnitClass::Ranged => 1,
        UnitClass::Robotic => 2,
    }
}

/// Effective power of one side.
///
/// Attack reads `melee_atk`/`ranged_atk`; defense reads `melee_def`/`ranged_def`
/// and applies `structure`. Each unit type's contribution is scaled by its
/// triangle factor against `opponent_class`, then the totals by the
/// commanding admiral's strength bonuses.
pub fn compute_power(
    catalog: &Catalog,
    units: &UnitCounts,
    role: Role,
    opponent_class: Option<UnitClass>,
    structure: &StructureBonus,
    admiral: &AdmiralBonus,
) -> Result<SidePower, BattleError> {
    let mut base = 0.0;
    let mut boosted = 0.0;
    let mut melee = 0.0;
    let mut ranged = 0.0;

    for (id, count) in units {
        if *count == 0 {
            continue;
        }
        let stat = catalog.unit(id)?;
        let (unit_melee, unit_ranged) = match role {
            Role::Attack => (stat.melee_atk, stat.ranged_atk),
            Role::Defense => (stat.melee_def, stat.ranged_def),
        };
        let factor = opponent_class
            .map(|over| catalog.advantage(stat.class, over))
            .unwrap_or(1.0);
        let count = f64::from(*count);
        melee += count * unit_melee * factor;
        ranged += count * unit_ranged * factor;
        base += count * (unit_melee + unit_ranged);
        boosted += count * (unit_melee + unit_ranged) * factor;
    }

    melee *= admiral.melee_multiplier();
    ranged *= admiral.ranged_multiplier();
    if role == Role::Defense {
        melee *= structure.melee_multiplier();
        ranged *= structure.ranged_multiplier();
    }

    Ok(SidePower {
        melee,
        ranged,
        triangle_bonus: if base > 0.0 { boosted / base } else { 1.0 },
    })
}

/// Scalar defense faced by `attack`: melee defense against the melee share
/// of the attack, ranged against the ranged share. A powerless attack faces
/// the plain mean.
pub fn weighted_defense(defense: &SidePower, attack: &SidePower) -> f64 {
    let total = attack.total();
    if total > 0.0 {
        defense.melee * (attack.melee / total) + defense.ranged * (attack.ranged / total)
    } else {
        (defense.melee + defense.ranged) / 2.0
    }
}
