// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Engine Benchmarks
// ─────────────────────────────────────────────────────────────────────
//! Criterion benchmarks for the per-pair similarity kernel, a single
//! cycle, and a full default-sized run.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use affinity_core::rng::{seeded, uniform_vector};
use affinity_core::{
    cosine_similarity, generate_population, generate_topics, recalculate_clusters,
    run_simulation, SimulationEngine,
};
use affinity_types::{
    Agent, ClusterCenter, DynamicsParams, RunParams, Topic, TopicScenario,
};

fn fixture(agents: usize, dimension: usize) -> (Vec<Agent>, Vec<ClusterCenter>, Vec<Topic>) {
    let mut rng = seeded(7);
    let pop = generate_population(&mut rng, agents, dimension, 3, None)
        .expect("population");
    let topics = generate_topics(
        &mut rng,
        dimension,
        TopicScenario::Standard,
        &pop.cluster_centers,
        None,
    )
    .expect("topics");
    (pop.agents, pop.cluster_centers, topics)
}

// ── cosine_similarity ───────────────────────────────────────────────

fn bench_cosine_d10(c: &mut Criterion) {
    let mut rng = seeded(1);
    let a = uniform_vector(&mut rng, 10, -1.0, 1.0);
    let b = uniform_vector(&mut rng, 10, -1.0, 1.0);
    c.bench_function("cosine_d10", |bch| {
        bch.iter(|| cosine_similarity(black_box(&a), black_box(&b)))
    });
}

fn bench_cosine_d256(c: &mut Criterion) {
    let mut rng = seeded(1);
    let a = uniform_vector(&mut rng, 256, -1.0, 1.0);
    let b = uniform_vector(&mut rng, 256, -1.0, 1.0);
    c.bench_function("cosine_d256", |bch| {
        bch.iter(|| cosine_similarity(black_box(&a), black_box(&b)))
    });
}

// ── SimulationEngine.step() ─────────────────────────────────────────

fn bench_step_100(c: &mut Criterion) {
    let (agents, centers, topics) = fixture(100, 10);
    let run = RunParams {
        cycles: usize::MAX,
        threshold: 0.3,
        recalculate_after: 0,
    };
    c.bench_function("engine_step_100x10", |b| {
        b.iter_batched(
            || {
                SimulationEngine::with_centers(
                    agents.clone(),
                    &topics,
                    centers.clone(),
                    run,
                    DynamicsParams::default(),
                )
                .expect("engine")
            },
            |mut engine| engine.step().expect("step"),
            BatchSize::SmallInput,
        )
    });
}

// ── recalculate_clusters() ──────────────────────────────────────────

fn bench_recluster_1000(c: &mut Criterion) {
    let (agents, centers, _) = fixture(1000, 10);
    c.bench_function("recluster_1000x10_k3", |b| {
        b.iter_batched(
            || agents.clone(),
            |mut agents| recalculate_clusters(&mut agents, black_box(&centers)),
            BatchSize::SmallInput,
        )
    });
}

// ── Full run: 100 agents, 20 cycles ─────────────────────────────────

fn bench_full_run(c: &mut Criterion) {
    let (agents, _, topics) = fixture(100, 10);
    c.bench_function("run_simulation_100x20", |b| {
        b.iter_batched(
            || agents.clone(),
            |agents| run_simulation(agents, black_box(&topics), 20, 0.3, 5),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_cosine_d10,
    bench_cosine_d256,
    bench_step_100,
    bench_recluster_1000,
    bench_full_run,
);
criterion_main!(benches);
