use std::hint::black_box;

use criterion::{criterion_group, AxisScale, BenchmarkId, Criterion, PlotConfiguration};
use maxflow_stress::{InstanceSource, RandomGenerator};

use super::generators::*;

// -----------------------------------------------------------------------------
// Benchmark functions
// -----------------------------------------------------------------------------

fn generate(max_edges: usize) -> impl FnMut() {
    let mut generator = RandomGenerator::with_limits(42, make_limits(max_edges));
    move || {
        black_box(generator.next_instance());
    }
}

// -----------------------------------------------------------------------------
// iai_callgrind definitions
// -----------------------------------------------------------------------------

#[iai_callgrind::library_benchmark]
#[bench::small(generate(10))]
#[bench::big(generate(1_000))]
fn callgrind_generate(mut f: impl FnMut()) {
    f()
}

iai_callgrind::library_benchmark_group!(
    name = callgrind_group;
    benchmarks = callgrind_generate
);

// -----------------------------------------------------------------------------
// Criterion definitions
// -----------------------------------------------------------------------------

fn criterion_generate(c: &mut Criterion) {
    let mut g = c.benchmark_group("generate a random instance");
    g.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in [10, 100, 1_000] {
        let mut f = generate(size);
        g.bench_with_input(BenchmarkId::new("generate", size), &size, |b, _| {
            b.iter(&mut f)
        });
    }
    g.finish();
}

criterion_group! {
    name = criterion_group;
    config = Criterion::default();
    targets =
        criterion_generate,
}
