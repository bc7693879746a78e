use siegeline::combat::{
    report_csv_string, resolve_report, Admiral, AdmiralBonus, Admirals, BattleInput,
    ForceSnapshot, Fortifications, Lanes, LootPolicy, Resources, Side, UnitCounts,
};
use siegeline::data::{load_catalog, Catalog, UnitId};

fn reference_catalog() -> Catalog {
    load_catalog(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.yaml"))
        .expect("reference catalog should load")
}

fn unit(id: &str) -> UnitId {
    UnitId::parse(id).unwrap()
}

fn force(units: &[(&str, u32)]) -> ForceSnapshot {
    ForceSnapshot::from_units(units.iter().map(|(id, count)| (unit(id), *count)))
}

fn counts(units: &[(&str, u32)]) -> UnitCounts {
    units.iter().map(|(id, count)| (unit(id), *count)).collect()
}

fn resources(pairs: &[(&str, u64)]) -> Resources {
    pairs
        .iter()
        .map(|(name, amount)| (name.to_string(), *amount))
        .collect()
}

/// 8 marines and 2 haulers walk in through an undefended left sector.
fn open_raid(stored: Resources, carry_rate: f64) -> BattleInput {
    BattleInput {
        attack: Lanes {
            left: vec![force(&[("marine", 8), ("hauler", 2)])],
            ..Lanes::default()
        },
        loot: LootPolicy { carry_rate, stored },
        ..BattleInput::default()
    }
}

#[test]
fn loot_is_capped_by_carry_capacity() {
    let catalog = reference_catalog();
    let report = resolve_report(
        &catalog,
        &open_raid(resources(&[("crystal", 5_000), ("ore", 5_000)]), 0.5),
    )
    .unwrap();

    // (8 * 20 + 2 * 200) * 0.5
    assert_eq!(report.loot_capacity(), 280);
    assert_eq!(report.loot(), &resources(&[("crystal", 140), ("ore", 140)]));
    assert_eq!(report.loot_total(), 280);
}

#[test]
fn loot_is_capped_by_stored_resources() {
    let catalog = reference_catalog();
    let report = resolve_report(
        &catalog,
        &open_raid(resources(&[("crystal", 30), ("ore", 70)]), 1.0),
    )
    .unwrap();

    assert_eq!(report.loot_capacity(), 560);
    assert_eq!(report.loot(), &resources(&[("crystal", 30), ("ore", 70)]));
}

#[test]
fn loot_split_uses_largest_remainder() {
    let catalog = reference_catalog();
    // Capacity (8 * 20 + 2 * 200) * 0.01 = 5.6 -> 5 over 1:1:1.
    let report = resolve_report(
        &catalog,
        &open_raid(resources(&[("crystal", 100), ("gas", 100), ("ore", 100)]), 0.01),
    )
    .unwrap();

    assert_eq!(report.loot_total(), 5);
    assert_eq!(
        report.loot(),
        &resources(&[("crystal", 2), ("gas", 2), ("ore", 1)])
    );
}

#[test]
fn defender_victory_means_no_loot() {
    let catalog = reference_catalog();
    let mut input = open_raid(resources(&[("ore", 1_000)]), 1.0);
    input.garrisons.left = force(&[("sentinel", 30)]);
    let report = resolve_report(&catalog, &input).unwrap();

    assert_eq!(report.winner(), Side::Defender);
    assert_eq!(report.loot_capacity(), 0);
    assert!(report.loot().is_empty());
}

#[test]
fn totals_sum_sector_and_surface_losses() {
    let catalog = reference_catalog();
    let input = BattleInput {
        attack: Lanes {
            left: vec![force(&[("ranger", 10)])],
            right: vec![force(&[("marine", 10)])],
            ..Lanes::default()
        },
        garrisons: Lanes {
            left: force(&[("marine", 10)]),
            right: force(&[("marine", 10)]),
            ..Lanes::default()
        },
        surface_garrison: force(&[("marine", 1)]),
        ..BattleInput::default()
    };
    let report = resolve_report(&catalog, &input).unwrap();

    let sectors = report.sectors();
    let surface = report.surface().expect("left breached");
    let mut expected_attacker = UnitCounts::new();
    for result in [&sectors.left, &sectors.center, &sectors.right] {
        for (id, lost) in &result.attacker_losses {
            *expected_attacker.entry(id.clone()).or_default() += lost;
        }
    }
    for (id, lost) in &surface.result.attacker_losses {
        *expected_attacker.entry(id.clone()).or_default() += lost;
    }
    assert_eq!(report.attacker_losses(), &expected_attacker);
    // Both garrisons wiped, plus the surface marine.
    assert_eq!(report.defender_losses(), &counts(&[("marine", 21)]));
}

#[test]
fn blind_attacker_sees_null_defender_units() {
    let catalog = reference_catalog();
    let mut input = open_raid(Resources::new(), 1.0);
    input.garrisons.center = force(&[("sentinel", 3)]);
    let report = resolve_report(&catalog, &input).unwrap();

    let masked = report.view_for(Side::Attacker, false);
    assert!(masked.intel_masked);
    assert!(masked.is_attacker);
    assert!(masked.won);
    let json = serde_json::to_value(&masked).unwrap();
    for sector in ["left", "center", "right"] {
        let value = &json["sectors"][sector];
        assert!(value.as_object().unwrap().contains_key("initial_defender_units"));
        assert!(value["initial_defender_units"].is_null());
    }

    let informed = serde_json::to_value(report.view_for(Side::Attacker, true)).unwrap();
    assert_eq!(
        informed["sectors"]["center"]["initial_defender_units"]["sentinel"],
        3
    );
    // The original report is untouched.
    assert!(report.sectors().center.initial_defender_units.is_some());
}

#[test]
fn defender_view_is_never_masked() {
    let catalog = reference_catalog();
    let report = resolve_report(&catalog, &open_raid(Resources::new(), 1.0)).unwrap();
    let view = report.view_for(Side::Defender, false);
    assert!(!view.intel_masked);
    assert!(!view.is_attacker);
    assert!(!view.won);
    assert_eq!(view.report.sectors().left.initial_defender_units, Some(UnitCounts::new()));
}

#[test]
fn admiral_metadata_is_stamped() {
    let catalog = reference_catalog();
    let mut input = open_raid(Resources::new(), 1.0);
    input.admirals = Admirals {
        attacker: Some(Admiral {
            name: "Vance".to_string(),
            bonus: AdmiralBonus {
                ranged_strength_bonus: 0.15,
                ..AdmiralBonus::NONE
            },
        }),
        defender: None,
    };
    let report = resolve_report(&catalog, &input).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["attacker_admiral"]["name"], "Vance");
    assert_eq!(json["attacker_admiral"]["bonus"]["ranged_strength_bonus"], 0.15);
    assert!(json["defender_admiral"].is_null());
}

#[test]
fn report_json_has_fixed_sector_slots() {
    let catalog = reference_catalog();
    let report = resolve_report(&catalog, &open_raid(Resources::new(), 1.0)).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    let sectors = json["sectors"].as_object().unwrap();
    let keys: Vec<_> = sectors.keys().cloned().collect();
    assert_eq!(keys.len(), 3);
    for key in ["left", "center", "right"] {
        assert!(sectors.contains_key(key));
    }
    assert_eq!(json["sectors"]["left"]["wave_results"][0]["unopposed"], true);
}

#[test]
fn csv_audit_lists_waves_then_surface() {
    let catalog = reference_catalog();
    let input = BattleInput {
        attack: Lanes {
            left: vec![force(&[("marine", 10)]), force(&[("ranger", 10)])],
            ..Lanes::default()
        },
        garrisons: Lanes {
            left: force(&[("marine", 12)]),
            ..Lanes::default()
        },
        ..BattleInput::default()
    };
    let report = resolve_report(&catalog, &input).unwrap();
    let csv = report_csv_string(&report).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "stage");
    assert_eq!(&headers[2], "winner");
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[0][0], "left");
    assert_eq!(&rows[0][1], "0");
    assert_eq!(&rows[0][2], "defender");
    assert_eq!(&rows[1][1], "1");
    assert_eq!(&rows[2][0], "surface");
    assert_eq!(&rows[2][1], "");
}

/// Marines against a center garrison behind a level-4 hub.
fn hub_siege() -> BattleInput {
    BattleInput {
        attack: Lanes {
            center: vec![force(&[("marine", 10)])],
            ..Lanes::default()
        },
        garrisons: Lanes {
            center: force(&[("marine", 10)]),
            ..Lanes::default()
        },
        fortifications: Lanes {
            center: Fortifications {
                hub_level: 4,
                ..Fortifications::default()
            },
            ..Lanes::default()
        },
        ..BattleInput::default()
    }
}

#[test]
fn report_json_has_three_sectors_and_wave_multipliers() {
    let catalog = reference_catalog();
    let report = resolve_report(&catalog, &hub_siege()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let sectors = json["sectors"].as_object().unwrap();
    let mut keys: Vec<&str> = sectors.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["center", "left", "right"]);

    let structure = &json["sectors"]["center"]["wave_results"][0]["structure"];
    assert!((structure["hub"].as_f64().unwrap() - 1.2).abs() < 1e-12);
    assert_eq!(structure["canopy"].as_f64(), Some(1.0));
    assert_eq!(structure["ranged_defense"].as_f64(), Some(1.0));
}

#[test]
fn csv_audit_carries_structure_multipliers() {
    let catalog = reference_catalog();
    let report = resolve_report(&catalog, &hub_siege()).unwrap();
    let csv = report_csv_string(&report).unwrap();

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let headers = reader.headers().unwrap().clone();
    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "center");
    let hub: f64 = rows[0][column("hub")].parse().unwrap();
    let canopy: f64 = rows[0][column("canopy")].parse().unwrap();
    assert!((hub - 1.2).abs() < 1e-12);
    assert_eq!(canopy, 1.0);
}
