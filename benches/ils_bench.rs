//! Criterion benchmarks for fire propagation and the full ILS.
//!
//! Uses synthetic square-grid scenarios with a corner ignition to measure
//! the propagation engine in isolation and the driver end to end.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fireline::graph::{propagate, Cell, FireGraph};
use fireline::ils::{FireIls, IlsConfig};
use fireline::scenario::{ReleaseSchedule, Scenario};

fn grid_scenario(side: i32, resources: usize) -> Scenario<Cell> {
    let graph = FireGraph::grid(side, side, 1.0, 1.5).expect("valid grid");
    let schedule =
        ReleaseSchedule::new(vec![(0.0, resources), (3.0, resources)]).expect("valid schedule");
    Scenario::new(graph, vec![Cell::new(0, 0)], 6.0, side as f64, schedule)
        .expect("valid scenario")
}

fn bench_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagation");

    for &side in &[10i32, 20, 40] {
        let scenario = grid_scenario(side, 2);
        let mut holds = vec![false; scenario.graph().len()];
        // A short diagonal fireline in the grid interior.
        for d in 0..side.min(4) {
            let idx = scenario
                .graph()
                .index_of(&Cell::new(d, side / 2))
                .expect("cell in grid");
            holds[idx] = true;
        }
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, _| {
            b.iter(|| {
                let prop = propagate(
                    black_box(scenario.graph()),
                    black_box(scenario.ignitions()),
                    scenario.delay(),
                    black_box(&holds),
                );
                black_box(prop)
            })
        });
    }
    group.finish();
}

fn bench_full_ils(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_ils");
    group.sample_size(10);

    for &(side, resources) in &[(6i32, 1usize), (8, 2)] {
        let scenario = grid_scenario(side, resources);
        let config = IlsConfig::default()
            .with_multistarts(10)
            .with_max_no_improvements(10)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("s{}_r{}", side, resources), side),
            &(scenario, config),
            |b, (s, c)| {
                b.iter(|| {
                    let result = FireIls::run(black_box(s), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_propagation, bench_full_ils);
criterion_main!(benches);
