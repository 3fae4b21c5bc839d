//! Proptest strategies for max-flow instances.

use crate::generator::{generate, InstanceLimits};
use crate::instance::{GraphInstance, MAX_EDGES, MAX_NODES, MAX_WEIGHT};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

prop_compose! {
    /// Random instance limits, from two-node graphs up to the largest
    /// instances the format allows.
    pub fn gen_limits()(
        max_nodes in InstanceLimits::MIN_NODES..=MAX_NODES,
        max_edges in 1..=MAX_EDGES,
        max_weight in 1..=MAX_WEIGHT,
    ) -> InstanceLimits {
        InstanceLimits::new(max_nodes, max_edges, max_weight).unwrap()
    }
}

prop_compose! {
    /// A random instance within `limits`, drawn the same way a stress run
    /// draws them.
    pub fn gen_instance(limits: InstanceLimits)(seed in any::<u64>()) -> GraphInstance {
        generate(&limits, &mut StdRng::seed_from_u64(seed))
    }
}

/// A random instance within random limits.
pub fn gen_any_instance() -> impl Strategy<Value = GraphInstance> {
    gen_limits().prop_flat_map(gen_instance)
}
