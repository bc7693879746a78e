use std::path::PathBuf;

use serde::Serialize;

use crate::combat::collision::Side;
use crate::combat::export_csv::report_csv_string;
use crate::combat::report::{resolve_report, BattleReport};
use crate::data::catalog::Catalog;
use crate::data::loader::load_catalog_file;
use crate::data::registry::{load_shared_catalog, resolve_catalog_path};
use crate::data::scenario::{load_battle_request, load_battle_requests};
use crate::data::validate::{validate_catalog_file, ValidationSeverity};
use crate::parallel::{resolve_batch, WorkerPool};

const USAGE: &str = "usage: siegeline <resolve|batch|validate|catalog>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Resolve,
    Batch,
    Validate,
    Catalog,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("resolve") => Some(Command::Resolve),
        Some("batch") => Some(Command::Batch),
        Some("validate") => Some(Command::Validate),
        Some("catalog") => Some(Command::Catalog),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Resolve) => handle_resolve(args),
        Some(Command::Batch) => handle_batch(args),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Catalog) => handle_catalog(),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolveOptions {
    path: String,
    viewer: Option<Side>,
    intel: bool,
    csv: bool,
}

fn parse_resolve_options(args: &[String]) -> Result<ResolveOptions, String> {
    let mut path = None;
    let mut viewer = None;
    let mut intel = true;
    let mut csv = false;

    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--viewer" => {
                viewer = match rest.next().map(String::as_str) {
                    Some("attacker") => Some(Side::Attacker),
                    Some("defender") => Some(Side::Defender),
                    Some(other) => return Err(format!("invalid viewer '{other}'")),
                    None => return Err("--viewer needs attacker|defender".to_string()),
                }
            }
            "--no-intel" => intel = false,
            "--csv" => csv = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            value if path.is_none() => path = Some(value.to_string()),
            value => return Err(format!("unexpected argument '{value}'")),
        }
    }

    Ok(ResolveOptions {
        path: path.ok_or_else(|| "missing battle file".to_string())?,
        viewer,
        intel,
        csv,
    })
}

fn load_catalog_or_report() -> Option<std::sync::Arc<Catalog>> {
    let path = resolve_catalog_path(None);
    match load_shared_catalog(&path) {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            eprintln!("failed to load catalog '{}': {err}", path.display());
            None
        }
    }
}

fn handle_resolve(args: &[String]) -> i32 {
    let options = match parse_resolve_options(args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!(
                "usage: siegeline resolve <battle.json> [--viewer attacker|defender] [--no-intel] [--csv]"
            );
            return 2;
        }
    };
    let Some(catalog) = load_catalog_or_report() else {
        return 1;
    };

    let request = match load_battle_request(&options.path) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("failed to read battle '{}': {err}", options.path);
            return 1;
        }
    };
    let label = request.label().to_string();
    let input = match request.into_input(&catalog) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("rejected battle '{label}': {err}");
            return 1;
        }
    };
    let report = match resolve_report(&catalog, &input) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("battle '{label}' failed: {err}");
            return 1;
        }
    };
    tracing::info!(
        battle = %label,
        winner = %report.winner(),
        loot = report.loot_total(),
        "battle resolved"
    );

    let payload = if options.csv {
        report_csv_string(&report).map_err(|err| err.to_string())
    } else if let Some(viewer) = options.viewer {
        serde_json::to_string_pretty(&report.view_for(viewer, options.intel))
            .map_err(|err| err.to_string())
    } else {
        serde_json::to_string_pretty(&report).map_err(|err| err.to_string())
    };
    match payload {
        Ok(payload) => {
            if options.csv {
                print!("{payload}");
            } else {
                println!("{payload}");
            }
            0
        }
        Err(err) => {
            eprintln!("failed to serialize report: {err}");
            1
        }
    }
}

#[derive(Debug, Serialize)]
struct BatchEntry {
    battle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<BattleReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn handle_batch(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: siegeline batch <battles.json> [workers]");
        return 2;
    };
    let workers = match args.get(3).map(|raw| raw.parse::<usize>()) {
        None => None,
        Some(Ok(n)) => Some(n),
        Some(Err(_)) => {
            eprintln!("invalid workers '{}'", args[3]);
            return 2;
        }
    };
    let Some(catalog) = load_catalog_or_report() else {
        return 1;
    };
    let requests = match load_battle_requests(path) {
        Ok(requests) => requests,
        Err(err) => {
            eprintln!("failed to read battles '{path}': {err}");
            return 1;
        }
    };

    // Decode first; only well-formed battles reach the engine.
    let mut entries = Vec::with_capacity(requests.len());
    let mut inputs = Vec::new();
    let mut slots = Vec::new();
    for request in requests {
        let battle_id = request.battle_id.clone();
        match request.into_input(&catalog) {
            Ok(input) => {
                slots.push(entries.len());
                inputs.push(input);
                entries.push(BatchEntry {
                    battle_id,
                    report: None,
                    error: None,
                });
            }
            Err(err) => entries.push(BatchEntry {
                battle_id,
                report: None,
                error: Some(err.to_string()),
            }),
        }
    }

    let pool = WorkerPool::from_env(workers);
    let results = match resolve_batch(&catalog, &inputs, &pool) {
        Ok(results) => results,
        Err(err) => {
            eprintln!("failed to start {} worker(s): {err}", pool.workers);
            return 1;
        }
    };
    for (slot, result) in slots.into_iter().zip(results) {
        match result {
            Ok(report) => entries[slot].report = Some(report),
            Err(err) => entries[slot].error = Some(err.to_string()),
        }
    }

    let failed = entries.iter().filter(|entry| entry.error.is_some()).count();
    tracing::info!(
        battles = entries.len(),
        failed,
        workers = pool.workers,
        "batch resolved"
    );
    match serde_json::to_string_pretty(&entries) {
        Ok(payload) => println!("{payload}"),
        Err(err) => {
            eprintln!("failed to serialize batch: {err}");
            return 1;
        }
    }
    if failed == 0 {
        0
    } else {
        1
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let path: PathBuf = resolve_catalog_path(args.get(2).map(String::as_str));
    let file = match load_catalog_file(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("failed to read catalog '{}': {err}", path.display());
            return 1;
        }
    };

    let report = validate_catalog_file(&file);
    for diag in &report.diagnostics {
        eprintln!("- {diag}");
    }
    if report.has_errors() {
        eprintln!("validation failed: {} error(s)", report.error_count());
        1
    } else {
        println!(
            "validation passed: {} ({} warning(s))",
            path.display(),
            report.count(ValidationSeverity::Warning)
        );
        0
    }
}

fn handle_catalog() -> i32 {
    let Some(catalog) = load_catalog_or_report() else {
        return 1;
    };
    match serde_json::to_string_pretty(&catalog.to_file()) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize catalog: {err}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_known_commands() {
        assert_eq!(parse_command(&args(&["siegeline", "resolve"])), Some(Command::Resolve));
        assert_eq!(parse_command(&args(&["siegeline", "catalog"])), Some(Command::Catalog));
        assert_eq!(parse_command(&args(&["siegeline", "serve"])), None);
        assert_eq!(parse_command(&args(&["siegeline"])), None);
    }

    #[test]
    fn resolve_options_accept_flags_in_any_order() {
        let options = parse_resolve_options(&args(&[
            "siegeline",
            "resolve",
            "--no-intel",
            "battle.json",
            "--viewer",
            "attacker",
        ]))
        .unwrap();
        assert_eq!(
            options,
            ResolveOptions {
                path: "battle.json".to_string(),
                viewer: Some(Side::Attacker),
                intel: false,
                csv: false,
            }
        );
    }

    #[test]
    fn resolve_options_reject_bad_input() {
        assert!(parse_resolve_options(&args(&["siegeline", "resolve"])).is_err());
        assert!(parse_resolve_options(&args(&["siegeline", "resolve", "a.json", "--viewer", "spy"])).is_err());
        assert!(parse_resolve_options(&args(&["siegeline", "resolve", "a.json", "b.json"])).is_err());
        assert!(parse_resolve_options(&args(&["siegeline", "resolve", "a.json", "--fast"])).is_err());
    }

    #[test]
    fn unknown_command_is_a_usage_error() {
        assert_eq!(run_with_args(&args(&["siegeline", "serve"])), 2);
    }
}
