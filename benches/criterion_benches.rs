//! Wall-time benchmarks using criterion.

#[allow(dead_code)]
mod benchmarks;

use criterion::criterion_main;

criterion_main! {
    benchmarks::generate::criterion_group,
    benchmarks::text::criterion_group,
}
