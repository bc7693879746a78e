//! Resolver throughput: single battles and parallel batches.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use siegeline::combat::{resolve_report, BattleInput, ForceSnapshot, Fortifications, Lanes};
use siegeline::data::{load_catalog, Catalog, UnitId};
use siegeline::parallel::{resolve_batch, WorkerPool};

fn catalog() -> Catalog {
    load_catalog(concat!(env!("CARGO_MANIFEST_DIR"), "/data/catalog.yaml"))
        .expect("reference catalog")
}

fn force(units: &[(&str, u32)]) -> ForceSnapshot {
    ForceSnapshot::from_units(
        units
            .iter()
            .map(|(id, count)| (UnitId::parse(id).expect("valid id"), *count)),
    )
}

/// Three contested sectors with several waves each, plus a surface garrison.
fn siege(scale: u32) -> BattleInput {
    let waves = || {
        vec![
            force(&[("marine", 5 * scale), ("ranger", 2 * scale)]),
            force(&[("sentinel", 4 * scale)]),
            force(&[("ranger", 6 * scale), ("hauler", scale)]),
        ]
    };
    BattleInput {
        attack: Lanes {
            left: waves(),
            center: waves(),
            right: waves(),
        },
        garrisons: Lanes::from_fn(|_| force(&[("marine", 6 * scale), ("sentinel", 3 * scale)])),
        fortifications: Lanes::from_fn(|sector| Fortifications {
            canopy_level: 3,
            hub_level: if sector.is_center() { 4 } else { 0 },
            minefield_level: 1,
        }),
        surface_garrison: force(&[("marine", 2 * scale)]),
        ..BattleInput::default()
    }
}

fn bench_single_battle(c: &mut Criterion) {
    let catalog = catalog();
    let mut group = c.benchmark_group("resolve_report");
    for scale in [1u32, 10, 100] {
        let input = siege(scale);
        group.bench_with_input(BenchmarkId::from_parameter(scale), &input, |b, input| {
            b.iter(|| resolve_report(black_box(&catalog), black_box(input)))
        });
    }
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let catalog = catalog();
    let inputs: Vec<BattleInput> = (1..=256).map(|i| siege(i % 16 + 1)).collect();

    let mut group = c.benchmark_group("resolve_batch");
    group.throughput(Throughput::Elements(inputs.len() as u64));
    for workers in [1usize, 4] {
        let pool = WorkerPool::with_workers(workers);
        group.bench_with_input(BenchmarkId::new("workers", workers), &pool, |b, pool| {
            b.iter(|| resolve_batch(black_box(&catalog), black_box(&inputs), pool))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_battle, bench_batch);
criterion_main!(benches);
