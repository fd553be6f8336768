//! Connected components benchmarks.
//!
//! Runs FastSV with and without the sampling phase on graphs whose blocks
//! are large enough for automatic sampling to apply.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use frontera_benches::{
    error::BenchSetupError,
    params::GraphBenchParams,
    synthetic::{SyntheticGraphConfig, generate},
};
use frontera_core::{ConnectivityConfig, Kind, SamplingPolicy, connected_components};

/// Seed used for all synthetic graph generation in this benchmark.
const SEED: u64 = 42;

/// Vertex counts to benchmark.
const VERTEX_COUNTS: &[usize] = &[10_000, 100_000];

/// Random neighbours drawn per vertex; above twice the default sample bound.
const AVERAGE_DEGREE: usize = 16;

/// Equal-sized blocks per graph, one component each.
const COMPONENTS: usize = 8;

fn components_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("components");
    group.sample_size(20);

    for &vertex_count in VERTEX_COUNTS {
        let graph = generate(&SyntheticGraphConfig {
            vertex_count,
            average_degree: AVERAGE_DEGREE,
            components: COMPONENTS,
            kind: Kind::Undirected,
            seed: SEED,
        })?;
        let params = GraphBenchParams {
            vertex_count,
            average_degree: AVERAGE_DEGREE,
        };
        for sampling in [SamplingPolicy::Always, SamplingPolicy::Never] {
            let config = ConnectivityConfig::default().with_sampling(sampling);
            group.bench_with_input(
                BenchmarkId::new(format!("{sampling:?}"), &params),
                &config,
                |b, config| {
                    b.iter(|| connected_components(&graph, config));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn components(c: &mut Criterion) {
    if let Err(err) = components_impl(c) {
        panic!("components benchmark setup failed: {err}");
    }
}

criterion_group!(benches, components);
criterion_main!(benches);
