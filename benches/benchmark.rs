use criterion::{criterion_group, criterion_main, Criterion};

use flat_planner::graph::Graph;
use flat_planner::level::Level;
use flat_planner::solvers::{ExhaustiveSolver, PruningSolver, Solver};

fn bench_ranking(c: &mut Criterion) {
    let level = Level::flat();
    let graph = Graph::flat();
    let mut group = c.benchmark_group("ranking");
    group.sample_size(10);
    group.bench_function("exhaustive", |b| b.iter(|| {
        ExhaustiveSolver {}.do_rank(&level, &graph)
    }));
    group.bench_function("pruning", |b| b.iter(|| {
        PruningSolver {}.do_rank(&level, &graph)
    }));
    group.finish();
}

criterion_group!(benches, bench_ranking);
criterion_main!(benches);
