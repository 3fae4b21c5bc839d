//! Benchmark instance generators.

use maxflow_stress::generator::generate;
use maxflow_stress::{GraphInstance, InstanceLimits};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Limits allowing up to `max_edges` edges over the full node range.
pub fn make_limits(max_edges: usize) -> InstanceLimits {
    InstanceLimits::new(500, max_edges, 1_000_000_000).unwrap()
}

/// A fixed random instance with at most `max_edges` edges.
pub fn make_instance(max_edges: usize) -> GraphInstance {
    generate(&make_limits(max_edges), &mut StdRng::seed_from_u64(0))
}
