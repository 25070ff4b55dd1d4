use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use harbor_core::domain::keyspace::AuthKeyspace;
use harbor_core::domain::value_objects::{Direction, DockId, ShipId};
use harbor_core::domain::{DockRegistry, DockSpec, FleetRegistry, ShipRequest};
use harbor_core::scheduling::priority;

fn benchmark_keyspace_string_at(c: &mut Criterion) {
    let keyspace = AuthKeyspace;
    let mut group = c.benchmark_group("keyspace_string_at");

    for length in [1usize, 5, 10] {
        let count = keyspace.count_for(length).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(length), &length, |b, &length| {
            b.iter(|| {
                // Sample across the range rather than enumerate all of it —
                // L=10 alone is ~60 million strings.
                for i in (0..count).step_by((count / 64).max(1) as usize) {
                    black_box(keyspace.string_at(length, i));
                }
            });
        });
    }

    group.finish();
}

fn benchmark_assignment_sort(c: &mut Criterion) {
    let mut fleet = FleetRegistry::new();
    for i in 0..500 {
        fleet.admit(ShipRequest {
            ship_id: ShipId(i),
            direction: if i % 2 == 0 { Direction::Inbound } else { Direction::Outbound },
            category: 1 + (i % 4),
            emergency: i % 37 == 0,
            arrival_timestep: i,
            waiting_time: 10 + (i % 20),
            cargo_weights: vec![5, 10, 15],
        });
    }

    c.bench_function("priority_sort_500_ships", |b| {
        b.iter(|| {
            black_box(fleet.sorted_indices_by(priority::compare));
        });
    });
}

fn benchmark_best_dock_lookup(c: &mut Criterion) {
    let specs: Vec<DockSpec> = (0..30)
        .map(|i| DockSpec {
            category: 1 + (i % 5),
            crane_capacities: vec![10; (1 + (i % 5)) as usize],
        })
        .collect();
    let docks = DockRegistry::from_specs(specs);
    let ship = harbor_core::domain::Ship::new(
        ShipId(1),
        Direction::Inbound,
        3,
        false,
        0,
        10,
        vec![5],
    );

    c.bench_function("best_dock_for_30_docks", |b| {
        b.iter(|| {
            black_box(docks.best_dock_for(&ship));
        });
    });

    let _ = DockId(0);
}

criterion_group!(
    benches,
    benchmark_keyspace_string_at,
    benchmark_assignment_sort,
    benchmark_best_dock_lookup
);
criterion_main!(benches);
