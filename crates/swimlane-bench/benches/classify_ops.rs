//! Criterion benchmarks for populating boards and checking moves.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use swimlane_bench::{generate_tickets, reference_profile, stress_profile, BenchTicket};
use swimlane_core::Coord;
use swimlane_engine::BoardContext;
use swimlane_rules::Transitions;

/// Benchmark: Populate the reference board with 1K tickets.
fn bench_populate_reference_1k(c: &mut Criterion) {
    let mut board = BoardContext::new(reference_profile()).unwrap();
    let tickets = generate_tickets(1_000, 8, 16, 42);

    c.bench_function("populate_reference_1k", |b| {
        b.iter(|| {
            let outcome = board.populate(tickets.clone()).unwrap();
            black_box(&outcome);
        });
    });
}

/// Benchmark: Populate the stress board with 20K tickets.
fn bench_populate_stress_20k(c: &mut Criterion) {
    let mut board = BoardContext::new(stress_profile()).unwrap();
    let tickets = generate_tickets(20_000, 32, 64, 42);

    c.bench_function("populate_stress_20k", |b| {
        b.iter(|| {
            let outcome = board.populate(tickets.clone()).unwrap();
            black_box(&outcome);
        });
    });
}

/// Benchmark: Evaluate every WIP limit of a populated stress board.
fn bench_validate_stress(c: &mut Criterion) {
    let mut board = BoardContext::new(stress_profile()).unwrap();
    board
        .populate(generate_tickets(20_000, 32, 64, 42))
        .unwrap();

    c.bench_function("validate_stress", |b| {
        b.iter(|| {
            let reports = board.validate().len();
            black_box(reports);
        });
    });
}

/// Benchmark: Check 1000 deterministic moves on the reference board.
fn bench_check_moves_reference(c: &mut Criterion) {
    let tickets = generate_tickets(1_000, 8, 16, 42);
    let mut board = BoardContext::new(reference_profile()).unwrap();
    board.populate(tickets.clone()).unwrap();
    board.set_drop_action(|_: &BenchTicket, acc: &Transitions| acc.is_empty());
    board.set_ticket_selector(|id: &str, t: &BenchTicket| t.id == id);

    // Pre-compute the moves: each ticket to a pseudo-random content cell.
    let moves: Vec<(String, Coord, Coord)> = tickets
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let i = i as u64;
            let status = (i.wrapping_mul(6364136223846793007) % 8) as u32;
            let lane = (i.wrapping_mul(2862933555777941757) % 16) as u32;
            let source = Coord::new(u32::from(t.lane) + 1, u32::from(t.status) + 1);
            (t.id.clone(), source, Coord::new(lane + 1, status + 1))
        })
        .collect();

    c.bench_function("check_moves_reference", |b| {
        b.iter(|| {
            for (id, source, target) in &moves {
                let decision = board.drop_ticket(id, *source, *target).unwrap();
                black_box(&decision);
            }
        });
    });
}

criterion_group!(
    benches,
    bench_populate_reference_1k,
    bench_populate_stress_20k,
    bench_validate_stress,
    bench_check_moves_reference
);
criterion_main!(benches);
