use std::collections::HashSet;
use std::fmt;

use crate::data::catalog::{CatalogFile, CombatRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check a raw catalog for problems the type system can't rule out:
/// duplicates, negative or non-finite numbers, and nonsensical rules.
pub fn validate_catalog_file(file: &CatalogFile) -> ValidationReport {
    let mut report = ValidationReport::default();

    if file.units.is_empty() {
        report.push(ValidationSeverity::Error, "units", "catalog defines no units");
    }

    let mut seen_units = HashSet::new();
    for (index, unit) in file.units.iter().enumerate() {
        let context = format!("units[{index}] id='{}'", unit.id);
        if !seen_units.insert(&unit.id) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.id"),
                format!("duplicate id '{}'", unit.id),
            );
        }

        let stats = [
            ("melee_atk", unit.melee_atk),
            ("ranged_atk", unit.ranged_atk),
            ("melee_def", unit.melee_def),
            ("ranged_def", unit.ranged_def),
        ];
        for (label, value) in stats {
            check_non_negative(&mut report, &context, label, value);
        }
        if stats.iter().all(|(_, value)| *value == 0.0) {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                "all combat stats are zero; the unit only carries loot",
            );
        }
        if unit.capacity == 0 {
            report.push(
                ValidationSeverity::Info,
                format!("{context}.capacity"),
                "unit carries no loot",
            );
        }
    }

    let mut seen_tools = HashSet::new();
    for (index, tool) in file.tools.iter().enumerate() {
        let context = format!("tools[{index}] id='{}'", tool.id);
        if !seen_tools.insert(&tool.id) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.id"),
                format!("duplicate id '{}'", tool.id),
            );
        }
        check_non_negative(&mut report, &context, "bonus_value", tool.bonus_value);
        if tool.bonus_value > 1.0 {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.bonus_value"),
                format!("bonus of {:.0}% per tool is unusually large", tool.bonus_value * 100.0),
            );
        }
    }

    validate_rules(&mut report, &file.rules);
    report
}

fn validate_rules(report: &mut ValidationReport, rules: &CombatRules) {
    check_non_negative(report, "rules", "canopy_unit_factor", rules.canopy_unit_factor);
    check_non_negative(report, "rules", "hub_unit_factor", rules.hub_unit_factor);
    check_non_negative(
        report,
        "rules",
        "surface_defense_bonus",
        rules.surface_defense_bonus,
    );

    if !(rules.loss_exponent.is_finite() && rules.loss_exponent > 0.0) {
        report.push(
            ValidationSeverity::Error,
            "rules.loss_exponent",
            format!("must be a positive number, got {}", rules.loss_exponent),
        );
    }

    let mut seen_pairs = HashSet::new();
    for (index, advantage) in rules.advantages.iter().enumerate() {
        let context = format!("rules.advantages[{index}]");
        if advantage.class == advantage.over {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("{:?} cannot hold an advantage over itself", advantage.class),
            );
        }
        if !(advantage.factor.is_finite() && advantage.factor >= 1.0) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.factor"),
                format!("advantage factor must be >= 1.0, got {}", advantage.factor),
            );
        }
        if !seen_pairs.insert((advantage.class, advantage.over)) {
            report.push(
                ValidationSeverity::Warning,
                context,
                "repeated advantage pair; factors multiply",
            );
        }
    }
}

fn check_non_negative(report: &mut ValidationReport, context: &str, label: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.{label}"),
            format!("must be a finite non-negative number, got {value}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::{Advantage, UnitClass, UnitId, UnitStat};

    fn unit(id: &str) -> UnitStat {
        UnitStat {
            id: UnitId::parse(id).unwrap(),
            melee_atk: 10.0,
            ranged_atk: 0.0,
            melee_def: 10.0,
            ranged_def: 6.0,
            capacity: 20,
            upkeep: 1,
            class: UnitClass::Melee,
        }
    }

    #[test]
    fn clean_catalog_has_no_errors() {
        let file = CatalogFile {
            units: vec![unit("marine")],
            ..CatalogFile::default()
        };
        let report = validate_catalog_file(&file);
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
    }

    #[test]
    fn duplicates_and_negative_stats_are_errors() {
        let mut broken = unit("marine");
        broken.melee_def = -1.0;
        let file = CatalogFile {
            units: vec![unit("marine"), broken],
            ..CatalogFile::default()
        };
        let report = validate_catalog_file(&file);
        assert_eq!(report.error_count(), 2);
        assert!(report
            .diagnostics
            .iter()
            .any(|diag| diag.message.contains("duplicate id 'marine'")));
    }

    #[test]
    fn rules_are_checked() {
        let mut file = CatalogFile {
            units: vec![unit("marine")],
            ..CatalogFile::default()
        };
        file.rules.loss_exponent = 0.0;
        file.rules.advantages.push(Advantage {
            class: UnitClass::Melee,
            over: UnitClass::Melee,
            factor: 0.9,
        });
        let report = validate_catalog_file(&file);
        assert_eq!(report.error_count(), 3);
    }

    #[test]
    fn zero_stat_unit_is_a_warning() {
        let mut hauler = unit("hauler");
        hauler.melee_atk = 0.0;
        hauler.melee_def = 0.0;
        hauler.ranged_def = 0.0;
        let report = validate_catalog_file(&CatalogFile {
            units: vec![hauler],
            ..CatalogFile::default()
        });
        assert!(!report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Warning), 1);
    }
}
