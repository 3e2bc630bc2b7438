use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use policygate::config::{ProfileName, SelectionConfig};
use policygate::gate::Gate;
use policygate::selection::{McdaMethod, Selector};
use policygate::Candidate;
use std::hint::black_box;

const TEXTS: [&str; 6] = [
    "We will dominate the market and eliminate all competitors permanently.",
    "Our design uses lock-in to keep users from leaving.",
    "We will permanently track users forever.",
    "We verify, test and monitor every release with safeguards.",
    "We encrypt records and ask for consent, with privacy by default.",
    "Users choose freely: participation is voluntary and informed.",
];

fn create_candidates(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| Candidate::new(format!("c{i}"), TEXTS[i % TEXTS.len()]))
        .collect()
}

fn benchmark_gate_check(c: &mut Criterion) {
    let gate = Gate::default();
    let candidate = Candidate::new("b", TEXTS[1]);

    c.bench_function("gate_check_with_repair", |b| {
        b.iter(|| gate.check(black_box(&candidate), None))
    });
}

fn benchmark_gate_batch(c: &mut Criterion) {
    let gate = Gate::default();
    let mut group = c.benchmark_group("gate_batch");

    for size in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || create_candidates(size),
                |candidates| gate.check_batch(black_box(candidates), None),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn benchmark_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");
    group.sample_size(20);

    for method in [McdaMethod::RobustWeight, McdaMethod::Topsis] {
        let config = SelectionConfig {
            method,
            ..Default::default()
        };
        let selector =
            Selector::new(config, Gate::default(), ProfileName::Default.to_profile()).unwrap();
        group.bench_function(method.as_str(), |b| {
            b.iter_batched(
                || create_candidates(30),
                |candidates| selector.select(black_box(candidates), None, 3),
                criterion::BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_gate_check,
    benchmark_gate_batch,
    benchmark_selection
);
criterion_main!(benches);
