//! Benchmarks for pipeline update traversal
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use datavis_pipeline::pipeline::nodes::{AppendFilter, ExpressionFilter, ValueSource};
use datavis_pipeline::{Executive, Node};

fn build_chain(exec: &Executive, length: usize) -> (Node, Node) {
    let source = exec.create(ValueSource::with_value(1.0));
    let mut last = source.clone();
    for _ in 0..length {
        let filter = exec.create(ExpressionFilter::with_expression("x + 1.0"));
        filter
            .set_input_connection(0, &last.output_port(0).unwrap())
            .unwrap();
        last = filter;
    }
    (source, last)
}

fn build_fan_in(exec: &Executive, width: usize) -> (Vec<Node>, Node) {
    let append = exec.create(AppendFilter::new());
    let sources: Vec<Node> = (0..width)
        .map(|i| {
            let source = exec.create(ValueSource::with_value(i as f64));
            append
                .add_input_connection(0, &source.output_port(0).unwrap())
                .unwrap();
            source
        })
        .collect();
    (sources, append)
}

fn bench_cache_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_hit");

    for length in [10, 100, 500].iter() {
        let exec = Executive::default();
        let (_source, sink) = build_chain(&exec, *length);
        sink.update().unwrap();

        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("chain", length), length, |b, _| {
            b.iter(|| black_box(sink.update().unwrap()));
        });
    }

    group.finish();
}

fn bench_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute");

    for length in [10, 100, 500].iter() {
        let exec = Executive::default();
        let (source, sink) = build_chain(&exec, *length);
        let mut value = 0.0;

        group.throughput(Throughput::Elements(*length as u64));
        group.bench_with_input(BenchmarkId::new("chain", length), length, |b, _| {
            b.iter(|| {
                value += 1.0;
                source.set_parameter(ValueSource::VALUE, value);
                black_box(sink.output_data(0).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_fan_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_in");

    for width in [10, 100, 1000].iter() {
        let exec = Executive::default();
        let (sources, append) = build_fan_in(&exec, *width);
        let mut value = 0.0;

        group.throughput(Throughput::Elements(*width as u64));
        group.bench_with_input(BenchmarkId::new("one_changed", width), width, |b, _| {
            b.iter(|| {
                value += 1.0;
                sources[0].set_parameter(ValueSource::VALUE, value);
                black_box(append.output_data(0).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cache_hit, bench_recompute, bench_fan_in);

criterion_main!(benches);
