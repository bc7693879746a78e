//! Battle report audit export as CSV: one row per wave, plus one for the surface.
//!
//! Columns: stage, wave, winner, unopposed, attacker_power, defender_power,
//! attacker_triangle_bonus, defender_triangle_bonus, canopy, hub,
//! ranged_defense, surface, attacker_units,
//! attacker_losses, defender_units, defender_losses. Unit columns are totals
//! across unit types.

use std::io::Write;

use serde::Serialize;

use crate::combat::collision::{Side, WaveResult};
use crate::combat::forces::total_units;
use crate::combat::report::BattleReport;

#[derive(Debug, Serialize)]
struct AuditRow<'a> {
    stage: &'a str,
    wave: Option<usize>,
    winner: Side,
    unopposed: bool,
    attacker_power: f64,
    defender_power: f64,
    attacker_triangle_bonus: f64,
    defender_triangle_bonus: f64,
    canopy: f64,
    hub: f64,
    ranged_defense: f64,
    surface: f64,
    attacker_units: u64,
    attacker_losses: u64,
    defender_units: u64,
    defender_losses: u64,
}

impl<'a> AuditRow<'a> {
    fn new(stage: &'a str, wave: Option<usize>, result: &WaveResult) -> Self {
        Self {
            stage,
            wave,
            winner: result.winner,
            unopposed: result.unopposed,
            attacker_power: result.attacker_power,
            defender_power: result.defender_power,
            attacker_triangle_bonus: result.attacker_triangle_bonus,
            defender_triangle_bonus: result.defender_triangle_bonus,
            canopy: result.structure.canopy,
            hub: result.structure.hub,
            ranged_defense: result.structure.ranged_defense,
            surface: result.structure.surface,
            attacker_units: total_units(&result.attacker_units),
            attacker_losses: total_units(&result.attacker_losses),
            defender_units: total_units(&result.defender_units),
            defender_losses: total_units(&result.defender_losses),
        }
    }
}

/// Write the audit table for `report` to `writer`. Sectors come in
/// left/center/right order, waves in submission order, surface last.
pub fn write_report_csv<W: Write>(report: &BattleReport, writer: W) -> Result<(), csv::Error> {
    let mut out = csv::Writer::from_writer(writer);
    for (sector, result) in report.sectors().iter() {
        for (index, wave) in result.wave_results.iter().enumerate() {
            out.serialize(AuditRow::new(sector.as_str(), Some(index), wave))?;
        }
    }
    if let Some(surface) = report.surface() {
        out.serialize(AuditRow::new("surface", None, &surface.result))?;
    }
    out.flush()?;
    Ok(())
}

/// [write_report_csv] into a string.
pub fn report_csv_string(report: &BattleReport) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_report_csv(report, &mut buf)?;
    String::from_utf8(buf).map_err(|err| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}
