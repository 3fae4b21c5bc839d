//! Random max-flow instance generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::instance::{Edge, GraphInstance, MAX_EDGES, MAX_NODES, MAX_WEIGHT};

/// Upper bounds for the size and capacities of generated instances.
///
/// The defaults are the largest values the instance format allows. Smaller
/// limits produce smaller counterexamples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLimits"))]
pub struct InstanceLimits {
    max_nodes: usize,
    max_edges: usize,
    max_weight: u64,
}

impl InstanceLimits {
    /// Smallest node count of a generated instance. A single node admits no
    /// edge without a self-loop.
    pub const MIN_NODES: usize = 2;

    /// Creates a new set of limits.
    ///
    /// # Errors
    ///
    /// Returns a [`LimitsError`] if a limit falls outside what the instance
    /// format allows.
    pub fn new(max_nodes: usize, max_edges: usize, max_weight: u64) -> Result<Self, LimitsError> {
        check_range("node", max_nodes as u64, Self::MIN_NODES as u64, MAX_NODES as u64)?;
        check_range("edge", max_edges as u64, 1, MAX_EDGES as u64)?;
        check_range("weight", max_weight, 1, MAX_WEIGHT)?;
        Ok(Self {
            max_nodes,
            max_edges,
            max_weight,
        })
    }

    /// Largest node count.
    #[inline]
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Largest edge count.
    #[inline]
    pub fn max_edges(&self) -> usize {
        self.max_edges
    }

    /// Largest edge capacity.
    #[inline]
    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }
}

impl Default for InstanceLimits {
    fn default() -> Self {
        Self {
            max_nodes: MAX_NODES,
            max_edges: MAX_EDGES,
            max_weight: MAX_WEIGHT,
        }
    }
}

/// Unchecked form of [`InstanceLimits`], validated on deserialization.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawLimits {
    max_nodes: usize,
    max_edges: usize,
    max_weight: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLimits> for InstanceLimits {
    type Error = LimitsError;

    fn try_from(raw: RawLimits) -> Result<Self, Self::Error> {
        InstanceLimits::new(raw.max_nodes, raw.max_edges, raw.max_weight)
    }
}

fn check_range(limit: &'static str, value: u64, min: u64, max: u64) -> Result<(), LimitsError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(LimitsError::OutOfRange {
            limit,
            value,
            min,
            max,
        })
    }
}

/// Error returned when constructing [`InstanceLimits`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum LimitsError {
    /// A limit is outside its allowed range.
    #[error("{limit} limit {value} is outside {min}..={max}")]
    OutOfRange {
        limit: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Generates a random instance within `limits`.
///
/// The node and edge counts are drawn uniformly, then every edge draws its
/// tail, head and capacity uniformly. The result only depends on the state of
/// `rng`.
pub fn generate<R: Rng>(limits: &InstanceLimits, rng: &mut R) -> GraphInstance {
    let node_count = rng.random_range(InstanceLimits::MIN_NODES..=limits.max_nodes);
    let edge_count = rng.random_range(1..=limits.max_edges);

    let mut edges = Vec::with_capacity(edge_count);
    for _ in 0..edge_count {
        edges.push(random_edge(node_count, limits.max_weight, rng));
    }
    GraphInstance::from_parts(node_count, edges)
}

fn random_edge<R: Rng>(node_count: usize, max_weight: u64, rng: &mut R) -> Edge {
    let from = rng.random_range(1..=node_count);
    // Pick among the other `node_count - 1` nodes, shifting past `from`.
    let mut to = rng.random_range(1..node_count);
    if to >= from {
        to += 1;
    }
    let weight = rng.random_range(1..=max_weight);
    Edge::new(from, to, weight)
}

/// A supply of instances for a stress run.
pub trait InstanceSource {
    /// Returns the instance for the next trial.
    fn next_instance(&mut self) -> GraphInstance;
}

impl<F> InstanceSource for F
where
    F: FnMut() -> GraphInstance,
{
    fn next_instance(&mut self) -> GraphInstance {
        self()
    }
}

/// Seeded source of random instances.
///
/// Two generators created with the same seed and limits produce the same
/// sequence of instances.
#[derive(Clone, Debug)]
pub struct RandomGenerator {
    rng: StdRng,
    seed: u64,
    limits: InstanceLimits,
}

impl RandomGenerator {
    /// Creates a generator with the default limits.
    pub fn new(seed: u64) -> Self {
        Self::with_limits(seed, InstanceLimits::default())
    }

    /// Creates a generator with custom limits.
    pub fn with_limits(seed: u64, limits: InstanceLimits) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            limits,
        }
    }

    /// The seed the generator was created with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The limits of the generated instances.
    #[inline]
    pub fn limits(&self) -> &InstanceLimits {
        &self.limits
    }
}

impl InstanceSource for RandomGenerator {
    fn next_instance(&mut self) -> GraphInstance {
        generate(&self.limits, &mut self.rng)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    fn assert_in_bounds(instance: &GraphInstance, limits: &InstanceLimits) {
        assert!((InstanceLimits::MIN_NODES..=limits.max_nodes()).contains(&instance.node_count()));
        assert!((1..=limits.max_edges()).contains(&instance.edge_count()));
        for edge in instance.edges() {
            assert!((1..=instance.node_count()).contains(&edge.from));
            assert!((1..=instance.node_count()).contains(&edge.to));
            assert_ne!(edge.from, edge.to);
            assert!((1..=limits.max_weight()).contains(&edge.weight));
        }
    }

    #[test]
    fn default_limits() {
        let limits = InstanceLimits::default();
        assert_eq!(limits.max_nodes(), 500);
        assert_eq!(limits.max_edges(), 1000);
        assert_eq!(limits.max_weight(), 1_000_000_000);
        assert_eq!(InstanceLimits::new(500, 1000, 1_000_000_000), Ok(limits));
    }

    #[rstest]
    #[case::single_node(1, 10, 10, "node")]
    #[case::too_many_nodes(501, 10, 10, "node")]
    #[case::no_edges(10, 0, 10, "edge")]
    #[case::too_many_edges(10, 1001, 10, "edge")]
    #[case::zero_weight(10, 10, 0, "weight")]
    #[case::heavy_weight(10, 10, 1_000_000_001, "weight")]
    fn limits_out_of_range(
        #[case] max_nodes: usize,
        #[case] max_edges: usize,
        #[case] max_weight: u64,
        #[case] expected: &str,
    ) {
        let LimitsError::OutOfRange { limit, .. } =
            InstanceLimits::new(max_nodes, max_edges, max_weight).unwrap_err();
        assert_eq!(limit, expected);
    }

    #[test]
    fn same_seed_same_instances() {
        let mut a = RandomGenerator::new(42);
        let mut b = RandomGenerator::new(42);
        for _ in 0..5 {
            assert_eq!(a.next_instance(), b.next_instance());
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn different_seeds_differ() {
        let a = RandomGenerator::new(1).next_instance();
        let b = RandomGenerator::new(2).next_instance();
        assert_ne!(a, b);
    }

    #[test]
    fn two_nodes_only_link_each_other() {
        let limits = InstanceLimits::new(2, 50, 3).unwrap();
        let mut generator = RandomGenerator::with_limits(7, limits);
        for _ in 0..20 {
            let instance = generator.next_instance();
            assert_eq!(instance.node_count(), 2);
            assert!(instance
                .edges()
                .iter()
                .all(|e| (e.from, e.to) == (1, 2) || (e.from, e.to) == (2, 1)));
        }
    }

    #[test]
    fn every_head_is_reachable() {
        // With three nodes and many edges, each tail should see both heads.
        let limits = InstanceLimits::new(3, 1000, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [[false; 4]; 4];
        for _ in 0..50 {
            let instance = generate(&limits, &mut rng);
            if instance.node_count() != 3 {
                continue;
            }
            for edge in instance.edges() {
                seen[edge.from][edge.to] = true;
            }
        }
        for from in 1..=3 {
            for to in 1..=3 {
                assert_eq!(seen[from][to], from != to, "edge {from} -> {to}");
            }
        }
    }

    #[cfg(feature = "serde")]
    #[rstest]
    #[case::single_node(r#"{"max_nodes":1,"max_edges":10,"max_weight":10}"#)]
    #[case::no_edges(r#"{"max_nodes":10,"max_edges":0,"max_weight":10}"#)]
    #[case::zero_weight(r#"{"max_nodes":10,"max_edges":10,"max_weight":0}"#)]
    fn deserialize_rejects_out_of_range(#[case] json: &str) {
        let err = serde_json::from_str::<InstanceLimits>(json).unwrap_err();
        assert!(err.to_string().contains("is outside"), "{err}");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_checked_limits() {
        let limits = InstanceLimits::new(4, 8, 16).unwrap();
        let json = serde_json::to_string(&limits).unwrap();
        let parsed: InstanceLimits = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, limits);
        let instance = RandomGenerator::with_limits(1, parsed).next_instance();
        assert!(instance.node_count() <= 4);
    }

    proptest! {
        #[test]
        fn generated_within_limits(
            seed in any::<u64>(),
            max_nodes in InstanceLimits::MIN_NODES..=MAX_NODES,
            max_edges in 1..=MAX_EDGES,
            max_weight in 1..=MAX_WEIGHT,
        ) {
            let limits = InstanceLimits::new(max_nodes, max_edges, max_weight).unwrap();
            let instance = generate(&limits, &mut StdRng::seed_from_u64(seed));
            assert_in_bounds(&instance, &limits);
            prop_assert!(GraphInstance::new(instance.node_count(), instance.edges().to_vec()).is_ok());
        }

        #[test]
        fn generation_is_deterministic(seed in any::<u64>()) {
            let limits = InstanceLimits::new(20, 40, 100).unwrap();
            let a = generate(&limits, &mut StdRng::seed_from_u64(seed));
            let b = generate(&limits, &mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(a, b);
        }
    }
}
