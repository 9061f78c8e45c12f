//! Embedding and pipeline benchmarks.
//!
//! - Ensemble embedding over different row counts, sequential and parallel
//! - Single-row pipeline transform latency
//! - Batch pipeline transform throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::Array2;

use treeprep::inference::embed_with;
use treeprep::model::{FeaturePipeline, PipelineConfig};
use treeprep::repr::{Forest, Model, ModelRangeEntry, Tree, TreeNode};
use treeprep::{ColumnSpec, Parallelism, RawValue};

const N_FEATURES: usize = 16;

/// Complete tree of `depth` levels cycling through the first `n_features` features.
fn balanced_tree(depth: usize, n_features: usize, feature: usize, seed: usize) -> TreeNode {
    if depth == 0 {
        return TreeNode::leaf(((seed * 7919) % 100) as f64 / 100.0 + 0.01);
    }
    let threshold = ((seed * 31 + depth * 17) % 100) as f64 / 100.0;
    TreeNode::split(
        feature % n_features,
        threshold,
        balanced_tree(depth - 1, n_features, feature + 1, seed * 2 + 1),
        balanced_tree(depth - 1, n_features, feature + 3, seed * 2 + 2),
    )
}

fn forest(n_trees: usize, depth: usize, n_features: usize) -> Forest {
    (0..n_trees)
        .map(|i| Tree::from_node(&balanced_tree(depth, n_features, i, i)))
        .collect()
}

/// Deterministic pseudo-random inputs in `[0, 1)`.
fn input(n_rows: usize) -> Array2<f64> {
    Array2::from_shape_fn((n_rows, N_FEATURES), |(i, j)| {
        ((i * 2_654_435 + j * 40_503) % 10_007) as f64 / 10_007.0
    })
}

// =============================================================================
// Embedding
// =============================================================================

fn bench_embed_rows(c: &mut Criterion) {
    let model = Model::from(forest(100, 6, N_FEATURES));
    let mut group = c.benchmark_group("embed/rows");

    for n_rows in [1, 100, 10_000] {
        let x = input(n_rows);
        group.throughput(Throughput::Elements(n_rows as u64));

        for (label, parallelism) in [
            ("sequential", Parallelism::Sequential),
            ("parallel", Parallelism::Parallel),
        ] {
            group.bench_with_input(BenchmarkId::new(label, n_rows), &x, |b, x| {
                b.iter(|| black_box(embed_with(black_box(x.view()), &model, parallelism)))
            });
        }
    }

    group.finish();
}

// =============================================================================
// Pipeline
// =============================================================================

fn pipeline(n_threads: usize) -> FeaturePipeline {
    let mut specs: Vec<ColumnSpec> = (0..N_FEATURES - 1)
        .map(|i| ColumnSpec::standardize(i, 0.5, 0.25))
        .collect();
    specs.push(ColumnSpec::one_hot(N_FEATURES - 1, ["a", "b", "c", "d"]));

    let trees = vec![
        ModelRangeEntry::new(0..8, forest(50, 4, 8)),
        ModelRangeEntry::new(8..16, forest(50, 4, 8)),
    ];
    let mut config = PipelineConfig::default();
    config.n_threads = std::num::NonZeroUsize::new(n_threads);
    FeaturePipeline::new(specs, trees, config).expect("valid benchmark pipeline")
}

fn raw_rows(n_rows: usize) -> Vec<Vec<RawValue>> {
    let x = input(n_rows);
    x.rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut raw: Vec<RawValue> =
                row.iter().take(N_FEATURES - 1).map(|v| RawValue::from(*v)).collect();
            raw.push(RawValue::from(["a", "b", "c", "d", "e"][i % 5]));
            raw
        })
        .collect()
}

fn bench_pipeline_row(c: &mut Criterion) {
    let p = pipeline(1);
    let row = raw_rows(1).remove(0);

    c.bench_function("pipeline/transform_row", |b| {
        b.iter(|| black_box(p.transform_row(black_box(&row))))
    });
}

fn bench_pipeline_batch(c: &mut Criterion) {
    let rows = raw_rows(10_000);
    let mut group = c.benchmark_group("pipeline/transform_batch");
    group.throughput(Throughput::Elements(rows.len() as u64));

    for n_threads in [1, 4] {
        let p = pipeline(n_threads);
        group.bench_with_input(BenchmarkId::new("threads", n_threads), &rows, |b, rows| {
            b.iter(|| black_box(p.transform_batch(black_box(rows))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_embed_rows, bench_pipeline_row, bench_pipeline_batch);
criterion_main!(benches);
