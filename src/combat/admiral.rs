use serde::{Deserialize, Serialize};

/// Commander modifiers. Strength bonuses multiply the commanding side's
/// melee/ranged totals; `canopy_reduction_bonus` is only read from the
/// attacking admiral and is expected to be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmiralBonus {
    #[serde(default)]
    pub melee_strength_bonus: f64,
    #[serde(default)]
    pub ranged_strength_bonus: f64,
    #[serde(default)]
    pub canopy_reduction_bonus: f64,
}

impl AdmiralBonus {
    pub const NONE: AdmiralBonus = AdmiralBonus {
        melee_strength_bonus: 0.0,
        ranged_strength_bonus: 0.0,
        canopy_reduction_bonus: 0.0,
    };

    pub fn melee_multiplier(&self) -> f64 {
        (1.0 + self.melee_strength_bonus).max(0.0)
    }

    pub fn ranged_multiplier(&self) -> f64 {
        (1.0 + self.ranged_strength_bonus).max(0.0)
    }

    /// Scale applied to a positive defender canopy bonus.
    pub fn canopy_scale(&self) -> f64 {
        (1.0 + self.canopy_reduction_bonus).max(0.0)
    }
}

/// Display record stamped on reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admiral {
    pub name: String,
    #[serde(default)]
    pub bonus: AdmiralBonus,
}

/// Both commanders, either of which may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Admirals {
    #[serde(default)]
    pub attacker: Option<Admiral>,
    #[serde(default)]
    pub defender: Option<Admiral>,
}

impl Admirals {
    pub fn attacker_bonus(&self) -> AdmiralBonus {
        self.attacker.as_ref().map(|a| a.bonus).unwrap_or_default()
    }

    pub fn defender_bonus(&self) -> AdmiralBonus {
        self.defender.as_ref().map(|a| a.bonus).unwrap_or_default()
    }
}
