//! Sequential waves against one sector's garrison.

use serde::Serialize;

use crate::combat::collision::{resolve_wave_collision, Side, WaveResult};
use crate::combat::forces::{add_counts, ForceSnapshot, ToolCounts, UnitCounts};
use crate::combat::lanes::Sector;
use crate::combat::structure::SectorDefense;
use crate::data::catalog::Catalog;
use crate::error::BattleError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorResult {
    pub sector: Sector,
    pub winner: Side,
    /// Contested waves only; unopposed passes are not counted.
    pub waves_fought: u32,
    pub wave_results: Vec<WaveResult>,
    pub initial_attacker_units: UnitCounts,
    /// `None` only in a masked report view.
    pub initial_defender_units: Option<UnitCounts>,
    pub attacker_losses: UnitCounts,
    pub defender_losses: UnitCounts,
    pub attacker_tools_by_wave: Vec<ToolCounts>,
    pub defender_tools: ToolCounts,
    pub minefield_level: u32,
    /// Breaching survivors plus every wave that never fought, with their tools.
    pub breach_force: ForceSnapshot,
}

impl SectorResult {
    pub fn breached(&self) -> bool {
        self.winner == Side::Attacker
    }
}

/// Run waves in order against the shrinking garrison, stopping at the first
/// breach. Waves after the breach pass through with units intact.
pub fn resolve_sector(
    catalog: &Catalog,
    sector: Sector,
    waves: &[ForceSnapshot],
    garrison: &ForceSnapshot,
    defense: &SectorDefense,
) -> Result<SectorResult, BattleError> {
    let mut initial_attacker_units = UnitCounts::new();
    for wave in waves {
        add_counts(&mut initial_attacker_units, &wave.units);
    }

    let mut remaining = garrison.clone();
    let mut wave_results = Vec::with_capacity(waves.len());
    let mut waves_fought = 0u32;
    let mut attacker_losses = UnitCounts::new();
    let mut defender_losses = UnitCounts::new();
    let mut breach_force = ForceSnapshot::default();
    let mut winner = Side::Defender;

    for (index, wave) in waves.iter().enumerate() {
        let result = resolve_wave_collision(catalog, wave, &remaining, defense, sector.is_center())?;
        tracing::debug!(
            %sector,
            wave = index,
            winner = %result.winner,
            attacker_power = result.attacker_power,
            defender_power = result.defender_power,
            unopposed = result.unopposed,
            "wave resolved"
        );

        if !result.unopposed {
            waves_fought += 1;
        }
        add_counts(&mut attacker_losses, &result.attacker_losses);
        add_counts(&mut defender_losses, &result.defender_losses);
        remaining = remaining.survivors(&result.defender_losses);

        if result.winner == Side::Attacker {
            winner = Side::Attacker;
            breach_force.merge(&wave.survivors(&result.attacker_losses));
            for unfought in &waves[index + 1..] {
                breach_force.merge(unfought);
            }
            wave_results.push(result);
            break;
        }
        wave_results.push(result);
    }

    Ok(SectorResult {
        sector,
        winner,
        waves_fought,
        wave_results,
        initial_attacker_units,
        initial_defender_units: Some(garrison.units.clone()),
        attacker_losses,
        defender_losses,
        attacker_tools_by_wave: waves.iter().map(|wave| wave.tools.clone()).collect(),
        defender_tools: garrison.tools.clone(),
        minefield_level: defense.fortifications.minefield_level,
        breach_force,
    })
}
