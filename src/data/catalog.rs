//! Unit and tool catalog: immutable stat tables plus the combat rules the
//! engine applies. Loaded once at startup and passed by reference into every
//! engine entry point.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, CatalogError};

fn is_valid_id(raw: &str) -> bool {
    !raw.is_empty()
        && raw
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-')
}

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse a raw id. Surrounding whitespace is trimmed; the rest must be
            /// lowercase ascii letters, digits, `_` or `-`.
            pub fn parse(raw: &str) -> Result<Self, CatalogError> {
                let trimmed = raw.trim();
                if is_valid_id(trimmed) {
                    Ok(Self(trimmed.to_string()))
                } else {
                    Err(CatalogError::InvalidId(raw.to_string()))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = CatalogError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

catalog_id!(
    /// Validated unit identifier (e.g. `marine`).
    UnitId
);
catalog_id!(
    /// Validated tool identifier (e.g. `invasion_anchor`).
    ToolId
);

/// Triangle tag. The derived ordering is the tie-break when two classes are
/// equally dominant in a force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    Melee,
    Ranged,
    Robotic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitStat {
    pub id: UnitId,
    pub melee_atk: f64,
    pub ranged_atk: f64,
    pub melee_def: f64,
    pub ranged_def: f64,
    /// Loot carried per surviving unit, before the carry rate.
    #[serde(default)]
    pub capacity: u32,
    #[serde(default)]
    pub upkeep: u32,
    pub class: UnitClass,
}

/// The defensive bonus a tool feeds or counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseKind {
    Canopy,
    Hub,
    RangedDefense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    Canopy,
    Hub,
    RangedDefense,
    CanopyBreaker,
    HubBreaker,
    RangedBreaker,
}

impl BonusType {
    /// Offensive tools reduce the opposing side's matching defensive bonus
    /// instead of buffing their own side.
    pub const fn is_offensive(self) -> bool {
        matches!(
            self,
            Self::CanopyBreaker | Self::HubBreaker | Self::RangedBreaker
        )
    }

    pub const fn defense_kind(self) -> DefenseKind {
        match self {
            Self::Canopy | Self::CanopyBreaker => DefenseKind::Canopy,
            Self::Hub | Self::HubBreaker => DefenseKind::Hub,
            Self::RangedDefense | Self::RangedBreaker => DefenseKind::RangedDefense,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStat {
    pub id: ToolId,
    pub bonus_type: BonusType,
    /// Fractional bonus per tool, e.g. 0.25 = +25%.
    pub bonus_value: f64,
    /// Production chain that yields the tool. Informational only.
    #[serde(default)]
    pub workshop: String,
}

/// `class` receives `factor` on its contribution when the opposing force's
/// dominant class is `over`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Advantage {
    pub class: UnitClass,
    pub over: UnitClass,
    pub factor: f64,
}

fn default_canopy_unit_factor() -> f64 {
    0.05
}

fn default_hub_unit_factor() -> f64 {
    0.05
}

fn default_loss_exponent() -> f64 {
    1.5
}

fn default_advantages() -> Vec<Advantage> {
    vec![
        Advantage {
            class: UnitClass::Ranged,
            over: UnitClass::Melee,
            factor: 1.1,
        },
        Advantage {
            class: UnitClass::Melee,
            over: UnitClass::Robotic,
            factor: 1.1,
        },
        Advantage {
            class: UnitClass::Robotic,
            over: UnitClass::Ranged,
            factor: 1.1,
        },
    ]
}

/// Numeric constants the engine applies. Tuning lives in the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatRules {
    /// Canopy bonus per structure level.
    #[serde(default = "default_canopy_unit_factor")]
    pub canopy_unit_factor: f64,
    /// Hub bonus per structure level (center sector only).
    #[serde(default = "default_hub_unit_factor")]
    pub hub_unit_factor: f64,
    /// Winner losses scale with `(loser_power / winner_power)^loss_exponent`.
    #[serde(default = "default_loss_exponent")]
    pub loss_exponent: f64,
    /// Flat fractional bonus for the surface garrison.
    #[serde(default)]
    pub surface_defense_bonus: f64,
    #[serde(default = "default_advantages")]
    pub advantages: Vec<Advantage>,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            canopy_unit_factor: default_canopy_unit_factor(),
            hub_unit_factor: default_hub_unit_factor(),
            loss_exponent: default_loss_exponent(),
            surface_defense_bonus: 0.0,
            advantages: default_advantages(),
        }
    }
}

/// On-disk catalog shape. Lists, so duplicates can be reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub units: Vec<UnitStat>,
    #[serde(default)]
    pub tools: Vec<ToolStat>,
    #[serde(default)]
    pub rules: CombatRules,
}

/// Immutable unit/tool tables and rules.
#[derive(Debug, Clone)]
pub struct Catalog {
    data_version: Option<String>,
    units: BTreeMap<UnitId, UnitStat>,
    tools: BTreeMap<ToolId, ToolStat>,
    rules: CombatRules,
}

impl Catalog {
    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut units = BTreeMap::new();
        for unit in file.units {
            let id = unit.id.clone();
            if units.insert(id.clone(), unit).is_some() {
                return Err(CatalogError::DuplicateId {
                    kind: "unit",
                    id: id.to_string(),
                });
            }
        }
        let mut tools = BTreeMap::new();
        for tool in file.tools {
            let id = tool.id.clone();
            if tools.insert(id.clone(), tool).is_some() {
                return Err(CatalogError::DuplicateId {
                    kind: "tool",
                    id: id.to_string(),
                });
            }
        }
        Ok(Self {
            data_version: file.data_version,
            units,
            tools,
            rules: file.rules,
        })
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            data_version: self.data_version.clone(),
            units: self.units.values().cloned().collect(),
            tools: self.tools.values().cloned().collect(),
            rules: self.rules.clone(),
        }
    }

    pub fn data_version(&self) -> Option<&str> {
        self.data_version.as_deref()
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    pub fn unit(&self, id: &UnitId) -> Result<&UnitStat, BattleError> {
        self.units
            .get(id)
            .ok_or_else(|| BattleError::UnknownUnit(id.clone()))
    }

    pub fn tool(&self, id: &ToolId) -> Result<&ToolStat, BattleError> {
        self.tools
            .get(id)
            .ok_or_else(|| BattleError::UnknownTool(id.clone()))
    }

    /// Parse a raw unit id and confirm the catalog knows it.
    pub fn unit_id(&self, raw: &str) -> Result<UnitId, CatalogError> {
        let id = UnitId::parse(raw)?;
        if self.units.contains_key(&id) {
            Ok(id)
        } else {
            Err(CatalogError::UnknownUnit(raw.to_string()))
        }
    }

    /// Parse a raw tool id and confirm the catalog knows it.
    pub fn tool_id(&self, raw: &str) -> Result<ToolId, CatalogError> {
        let id = ToolId::parse(raw)?;
        if self.tools.contains_key(&id) {
            Ok(id)
        } else {
            Err(CatalogError::UnknownTool(raw.to_string()))
        }
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitStat> {
        self.units.values()
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolStat> {
        self.tools.values()
    }

    /// Advantage factor `class` gets against an opposing force dominated by
    /// `over`; `1.0` when no advantage is configured. Multiple matching
    /// entries multiply.
    pub fn advantage(&self, class: UnitClass, over: UnitClass) -> f64 {
        self.rules
            .advantages
            .iter()
            .filter(|adv| adv.class == class && adv.over == over)
            .map(|adv| adv.factor)
            .product()
    }
}
