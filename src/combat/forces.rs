//! Force snapshots: unit and tool counts committed by one side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::catalog::{ToolId, UnitId};

pub type UnitCounts = BTreeMap<UnitId, u32>;
pub type ToolCounts = BTreeMap<ToolId, u32>;

/// Units plus the tools applied on that side. Ordered maps keep iteration,
/// and therefore every report, deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceSnapshot {
    #[serde(default)]
    pub units: UnitCounts,
    #[serde(default)]
    pub tools: ToolCounts,
}

impl ForceSnapshot {
    /// Build a snapshot, dropping zero counts so they can never surface as losses.
    pub fn new<U, T>(units: U, tools: T) -> Self
    where
        U: IntoIterator<Item = (UnitId, u32)>,
        T: IntoIterator<Item = (ToolId, u32)>,
    {
        let mut snapshot = Self::default();
        for (id, count) in units {
            add_unit(&mut snapshot.units, id, count);
        }
        for (id, count) in tools {
            if count > 0 {
                let entry = snapshot.tools.entry(id).or_default();
                *entry = entry.saturating_add(count);
            }
        }
        snapshot
    }

    pub fn from_units<U>(units: U) -> Self
    where
        U: IntoIterator<Item = (UnitId, u32)>,
    {
        Self::new(units, std::iter::empty())
    }

    pub fn total_units(&self) -> u64 {
        total_units(&self.units)
    }

    /// No unit with a positive count. Tools alone don't make a garrison.
    pub fn is_empty(&self) -> bool {
        self.total_units() == 0
    }

    /// Same tools, units reduced by `losses`.
    pub fn survivors(&self, losses: &UnitCounts) -> Self {
        Self {
            units: subtract_counts(&self.units, losses),
            tools: self.tools.clone(),
        }
    }

    pub fn merge(&mut self, other: &Self) {
        add_counts(&mut self.units, &other.units);
        for (id, count) in &other.tools {
            if *count > 0 {
                let entry = self.tools.entry(id.clone()).or_default();
                *entry = entry.saturating_add(*count);
            }
        }
    }
}

pub fn total_units(counts: &UnitCounts) -> u64 {
    counts.values().map(|count| u64::from(*count)).sum()
}

/// Saturates at `u32::MAX`. Decoded requests never get there: per-side
/// totals are bounded when a request is turned into a battle input.
fn add_unit(counts: &mut UnitCounts, id: UnitId, count: u32) {
    if count > 0 {
        let entry = counts.entry(id).or_default();
        *entry = entry.saturating_add(count);
    }
}

pub fn add_counts(into: &mut UnitCounts, from: &UnitCounts) {
    for (id, count) in from {
        add_unit(into, id.clone(), *count);
    }
}

/// `base - losses`, floored at zero per unit type; empty entries are dropped.
pub fn subtract_counts(base: &UnitCounts, losses: &UnitCounts) -> UnitCounts {
    base.iter()
        .filter_map(|(id, count)| {
            let lost = losses.get(id).copied().unwrap_or(0);
            let left = count.saturating_sub(lost);
            (left > 0).then(|| (id.clone(), left))
        })
        .collect()
}
