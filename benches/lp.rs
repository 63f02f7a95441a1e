//! Benchmarks for the two-phase simplex solver on synthetic dense LPs.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use factoria_optimization::lp::{minimize, LpProblem};

/// A chain of `n` variables bounded above by per-variable caps and anchored
/// by a single equality summing to half the total cap — dense enough to
/// exercise several simplex iterations without being degenerate.
fn chain_problem(n: usize) -> LpProblem {
    let caps: Vec<f64> = (0..n).map(|i| 10.0 + i as f64).collect();
    let total: f64 = caps.iter().sum::<f64>() / 2.0;

    let mut a_ub = Vec::new();
    let mut b_ub = Vec::new();
    for (i, &cap) in caps.iter().enumerate() {
        let mut row = vec![0.0; n];
        row[i] = 1.0;
        a_ub.push(row);
        b_ub.push(cap);
    }

    LpProblem {
        c: (0..n).map(|i| 1.0 + (i % 7) as f64).collect(),
        a_eq: vec![vec![1.0; n]],
        b_eq: vec![total],
        a_ub,
        b_ub,
    }
}

fn bench_simplex(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_phase_simplex");
    for &n in &[10usize, 25, 50] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let problem = chain_problem(n);
            b.iter(|| minimize(&problem).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simplex);
criterion_main!(benches);
