//! Performance benchmarks for nonlinear-ta indicators.
//!
//! Run with: `cargo bench -p nonlinear-ta`
//!
//! Window kernels are quadratic (or worse) in the window length, so each
//! indicator is measured over series sizes at a fixed window and, separately,
//! over window lengths at a fixed series size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nonlinear_ta::batch::BatchProcessor;
use nonlinear_ta::builder::IndicatorSeriesBuilder;
use nonlinear_ta::indicators::{
    approximate_entropy, lempel_ziv, lyapunov, multifractal, mutual_information,
    recurrence_quantification, shannon_entropy, MutualInformation, RecurrenceQuantification,
};

/// Generate a deterministic positive series.
fn generate_series(size: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(size);
    let mut price = 100.0;
    for i in 0..size {
        let delta = ((i as f64 * 0.1).sin() * 2.0) + ((i as f64 * 0.03).cos() * 1.5);
        price += delta;
        price = price.max(10.0);
        data.push(price);
    }
    data
}

const SIZES: &[usize] = &[500, 2_000, 10_000];
const WINDOW: usize = 64;

fn bench_over_sizes<R>(c: &mut Criterion, name: &str, f: impl Fn(&[f64]) -> R) {
    let mut group = c.benchmark_group(name);
    for &size in SIZES {
        let data = generate_series(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| f(black_box(data)))
        });
    }
    group.finish();
}

fn bench_lyapunov(c: &mut Criterion) {
    bench_over_sizes(c, "lyapunov", |d| lyapunov(d, WINDOW));
}

fn bench_lempel_ziv(c: &mut Criterion) {
    bench_over_sizes(c, "lempel_ziv", |d| lempel_ziv(d, WINDOW));
}

fn bench_shannon(c: &mut Criterion) {
    bench_over_sizes(c, "shannon_entropy", |d| shannon_entropy(d, WINDOW));
}

fn bench_approximate_entropy(c: &mut Criterion) {
    bench_over_sizes(c, "approximate_entropy", |d| approximate_entropy(d, WINDOW, 2, 3.0));
}

fn bench_mutual_information(c: &mut Criterion) {
    let config = MutualInformation::new();
    bench_over_sizes(c, "mutual_information", |d| mutual_information(d, WINDOW, &config));
}

fn bench_multifractal(c: &mut Criterion) {
    bench_over_sizes(c, "multifractal", |d| multifractal(d, WINDOW));
}

fn bench_rqa(c: &mut Criterion) {
    bench_over_sizes(c, "rqa", |d| recurrence_quantification(d, WINDOW));
}

fn bench_rqa_window_len(c: &mut Criterion) {
    let mut group = c.benchmark_group("rqa_window_len");
    let data = generate_series(2_000);
    for &window in &[16_usize, 32, 64, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &window| {
            b.iter(|| recurrence_quantification(black_box(&data), window))
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let data = generate_series(10_000);
    for (name, processor) in [
        ("sequential", BatchProcessor::sequential()),
        ("default", BatchProcessor::new()),
    ] {
        let builder = IndicatorSeriesBuilder::new(RecurrenceQuantification::new(), WINDOW)
            .processor(processor);
        group.bench_function(name, |b| b.iter(|| builder.build(black_box(&data))));
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_lyapunov,
    bench_lempel_ziv,
    bench_shannon,
    bench_approximate_entropy,
    bench_mutual_information,
    bench_multifractal,
    bench_rqa,
    bench_rqa_window_len,
    bench_dispatch,
);
criterion_main!(benches);
