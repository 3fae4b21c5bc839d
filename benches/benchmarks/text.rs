use std::hint::black_box;

use criterion::{criterion_group, AxisScale, BenchmarkId, Criterion, PlotConfiguration};
use maxflow_stress::GraphInstance;

use super::generators::*;

fn bench_write_instance(c: &mut Criterion) {
    let mut g = c.benchmark_group("write an instance");
    g.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in [10, 100, 1_000] {
        let instance = make_instance(size);
        g.bench_with_input(BenchmarkId::new("to_string", size), &size, |b, _| {
            b.iter(|| black_box(instance.to_string()))
        });
    }
    g.finish();
}

fn bench_parse_instance(c: &mut Criterion) {
    let mut g = c.benchmark_group("parse an instance");
    g.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in [10, 100, 1_000] {
        let text = make_instance(size).to_string();
        g.bench_with_input(BenchmarkId::new("parse", size), &size, |b, _| {
            b.iter(|| black_box(text.parse::<GraphInstance>().unwrap()))
        });
    }
    g.finish();
}

criterion_group! {
    name = criterion_group;
    config = Criterion::default();
    targets =
        bench_write_instance,
        bench_parse_instance,
}
