//! Final battle report: totals, loot, admiral metadata, per-viewer rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::admiral::{Admiral, Admirals};
use crate::combat::apportion::apportion;
use crate::combat::battle::{resolve_battle, BattleInput, BattleOutcome, SurfaceResult};
use crate::combat::collision::Side;
use crate::combat::forces::{add_counts, UnitCounts};
use crate::combat::lanes::{Lanes, Sector};
use crate::combat::sector::SectorResult;
use crate::data::catalog::Catalog;
use crate::error::BattleError;

/// Resource name to amount.
pub type Resources = BTreeMap<String, u64>;

pub fn default_carry_rate() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootPolicy {
    /// Fraction of each survivor's capacity that can be filled.
    #[serde(default = "default_carry_rate")]
    pub carry_rate: f64,
    /// Resources stored in the defending colony.
    #[serde(default)]
    pub stored: Resources,
}

impl Default for LootPolicy {
    fn default() -> Self {
        Self {
            carry_rate: default_carry_rate(),
            stored: Resources::new(),
        }
    }
}

/// Serialize-only: reports are produced by the engine, never read back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleReport {
    winner: Side,
    attacker_losses: UnitCounts,
    defender_losses: UnitCounts,
    surviving_attacker_units: UnitCounts,
    loot_capacity: u64,
    loot: Resources,
    sectors: Lanes<SectorResult>,
    surface: Option<SurfaceResult>,
    attacker_admiral: Option<Admiral>,
    defender_admiral: Option<Admiral>,
}

impl BattleReport {
    pub fn winner(&self) -> Side {
        self.winner
    }

    pub fn attacker_losses(&self) -> &UnitCounts {
        &self.attacker_losses
    }

    pub fn defender_losses(&self) -> &UnitCounts {
        &self.defender_losses
    }

    pub fn surviving_attacker_units(&self) -> &UnitCounts {
        &self.surviving_attacker_units
    }

    pub fn loot_capacity(&self) -> u64 {
        self.loot_capacity
    }

    pub fn loot(&self) -> &Resources {
        &self.loot
    }

    pub fn loot_total(&self) -> u64 {
        self.loot.values().sum()
    }

    pub fn sectors(&self) -> &Lanes<SectorResult> {
        &self.sectors
    }

    pub fn surface(&self) -> Option<&SurfaceResult> {
        self.surface.as_ref()
    }

    pub fn attacker_admiral(&self) -> Option<&Admiral> {
        self.attacker_admiral.as_ref()
    }

    pub fn defender_admiral(&self) -> Option<&Admiral> {
        self.defender_admiral.as_ref()
    }

    /// Render for one participant. The attacker without sufficient intel
    /// sees every sector's `initial_defender_units` as `null`.
    pub fn view_for(&self, viewer: Side, intel_sufficient: bool) -> ReportView {
        let masked = viewer == Side::Attacker && !intel_sufficient;
        let mut report = self.clone();
        if masked {
            for sector in Sector::ALL {
                report.sectors.get_mut(sector).initial_defender_units = None;
            }
        }
        ReportView {
            is_attacker: viewer == Side::Attacker,
            won: viewer == self.winner,
            intel_masked: masked,
            report,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub is_attacker: bool,
    pub won: bool,
    pub intel_masked: bool,
    #[serde(flatten)]
    pub report: BattleReport,
}

/// Total losses, survivors and loot from a resolved battle.
pub fn assemble_report(
    catalog: &Catalog,
    outcome: BattleOutcome,
    admirals: &Admirals,
    loot: &LootPolicy,
) -> Result<BattleReport, BattleError> {
    let mut attacker_losses = UnitCounts::new();
    let mut defender_losses = UnitCounts::new();
    for (_, sector) in outcome.sectors.iter() {
        add_counts(&mut attacker_losses, &sector.attacker_losses);
        add_counts(&mut defender_losses, &sector.defender_losses);
    }
    if let Some(surface) = &outcome.surface {
        add_counts(&mut attacker_losses, &surface.result.attacker_losses);
        add_counts(&mut defender_losses, &surface.result.defender_losses);
    }

    let survivors = outcome.surviving_attackers.units;
    let (loot_capacity, plunder) = if outcome.winner == Side::Attacker {
        let capacity = carry_capacity(catalog, &survivors, loot.carry_rate)?;
        (capacity, apportion(&loot.stored, capacity))
    } else {
        (0, Resources::new())
    };

    Ok(BattleReport {
        winner: outcome.winner,
        attacker_losses,
        defender_losses,
        surviving_attacker_units: survivors,
        loot_capacity,
        loot: plunder,
        sectors: outcome.sectors,
        surface: outcome.surface,
        attacker_admiral: admirals.attacker.clone(),
        defender_admiral: admirals.defender.clone(),
    })
}

/// `floor(Σ count * capacity * carry_rate)`; never negative.
fn carry_capacity(catalog: &Catalog, units: &UnitCounts, carry_rate: f64) -> Result<u64, BattleError> {
    let mut raw = 0.0;
    for (id, count) in units {
        raw += f64::from(*count) * f64::from(catalog.unit(id)?.capacity);
    }
    let capacity = (raw * carry_rate).floor();
    Ok(if capacity.is_finite() && capacity > 0.0 {
        capacity as u64
    } else {
        0
    })
}

/// Resolve and assemble in one step.
pub fn resolve_report(catalog: &Catalog, input: &BattleInput) -> Result<BattleReport, BattleError> {
    let outcome = resolve_battle(
        catalog,
        &input.attack,
        &input.garrisons,
        &input.fortifications,
        &input.admirals,
        &input.surface_garrison,
    )?;
    assemble_report(catalog, outcome, &input.admirals, &input.loot)
}
