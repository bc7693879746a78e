//! Battle orchestration: three independent sectors, then the surface stage.

use serde::Serialize;

use crate::combat::admiral::Admirals;
use crate::combat::collision::{clash, Side, WaveResult};
use crate::combat::forces::ForceSnapshot;
use crate::combat::lanes::Lanes;
use crate::combat::report::LootPolicy;
use crate::combat::sector::{resolve_sector, SectorResult};
use crate::combat::structure::{surface_bonus, Fortifications, SectorDefense};
use crate::data::catalog::Catalog;
use crate::error::BattleError;

/// Fully typed, catalog-checked battle. Built from a request by
/// [crate::data::scenario::BattleRequest::into_input] or directly in code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleInput {
    pub attack: Lanes<Vec<ForceSnapshot>>,
    pub garrisons: Lanes<ForceSnapshot>,
    pub fortifications: Lanes<Fortifications>,
    pub surface_garrison: ForceSnapshot,
    pub admirals: Admirals,
    pub loot: LootPolicy,
}

/// Melee and ranged multipliers applied to one side's totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthMultipliers {
    pub melee: f64,
    pub ranged: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceResult {
    #[serde(flatten)]
    pub result: WaveResult,
    /// The attacking admiral's strength multipliers.
    pub attacker_bonus: StrengthMultipliers,
    /// Surface rule and ranged-defense tools times the defending admiral.
    pub defender_bonus: StrengthMultipliers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub sectors: Lanes<SectorResult>,
    pub surface: Option<SurfaceResult>,
    pub winner: Side,
    /// Attacking units left standing at the end: surface survivors, or the
    /// combined breach force when there was nothing to fight on the surface.
    pub surviving_attackers: ForceSnapshot,
}

impl BattleOutcome {
    pub fn any_breach(&self) -> bool {
        self.sectors.iter().any(|(_, sector)| sector.breached())
    }
}

pub fn resolve_battle(
    catalog: &Catalog,
    attack: &Lanes<Vec<ForceSnapshot>>,
    garrisons: &Lanes<ForceSnapshot>,
    fortifications: &Lanes<Fortifications>,
    admirals: &Admirals,
    surface_garrison: &ForceSnapshot,
) -> Result<BattleOutcome, BattleError> {
    let attacker_admiral = admirals.attacker_bonus();
    let defender_admiral = admirals.defender_bonus();

    let sectors = attack.try_map(|sector, waves| {
        let defense = SectorDefense {
            fortifications: *fortifications.get(sector),
            attacker_admiral,
            defender_admiral,
        };
        resolve_sector(catalog, sector, waves, garrisons.get(sector), &defense)
    })?;

    let mut surface_force = ForceSnapshot::default();
    for (_, result) in sectors.iter() {
        if result.breached() {
            surface_force.merge(&result.breach_force);
        }
    }
    let any_breach = sectors.iter().any(|(_, result)| result.breached());

    let (surface, winner, surviving_attackers) = if !any_breach {
        (None, Side::Defender, ForceSnapshot::default())
    } else if surface_force.is_empty() {
        // Breached, but no attacking unit is left to invade.
        (None, Side::Attacker, surface_force)
    } else {
        let structure = surface_bonus(catalog, &surface_garrison.tools, &surface_force.tools)?;
        let result = clash(
            catalog,
            &surface_force,
            surface_garrison,
            &structure,
            &attacker_admiral,
            &defender_admiral,
        )?;
        tracing::debug!(
            winner = %result.winner,
            attacker_power = result.attacker_power,
            defender_power = result.defender_power,
            unopposed = result.unopposed,
            "surface resolved"
        );
        let survivors = surface_force.survivors(&result.attacker_losses);
        let winner = result.winner;
        let surface = SurfaceResult {
            attacker_bonus: StrengthMultipliers {
                melee: attacker_admiral.melee_multiplier(),
                ranged: attacker_admiral.ranged_multiplier(),
            },
            defender_bonus: StrengthMultipliers {
                melee: structure.melee_multiplier() * defender_admiral.melee_multiplier(),
                ranged: structure.ranged_multiplier() * defender_admiral.ranged_multiplier(),
            },
            result,
        };
        (Some(surface), winner, survivors)
    };

    tracing::debug!(
        %winner,
        breaches = sectors.iter().filter(|(_, result)| result.breached()).count(),
        surface = surface.is_some(),
        "battle resolved"
    );

    Ok(BattleOutcome {
        sectors,
        surface,
        winner,
        surviving_attackers,
    })
}
