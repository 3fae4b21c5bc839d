//! Max-flow instances and their line-oriented text format.
//!
//! An instance is written as a header line `"<node_count> <edge_count>"`
//! followed by one `"<from> <to> <weight>"` line per directed edge, in
//! insertion order. Nodes are numbered from `1`. The flow is computed from
//! node [`GraphInstance::SOURCE`] to node [`GraphInstance::sink`], i.e. from
//! the first to the last node; the format itself does not encode this.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest node count of an instance.
pub const MAX_NODES: usize = 500;
/// Largest edge count of an instance.
pub const MAX_EDGES: usize = 1000;
/// Largest capacity of a single edge.
pub const MAX_WEIGHT: u64 = 1_000_000_000;

/// A directed edge with a positive capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Tail of the edge, in `1..=node_count`.
    pub from: usize,
    /// Head of the edge, in `1..=node_count` and distinct from `from`.
    pub to: usize,
    /// Capacity of the edge, in `1..=MAX_WEIGHT`.
    pub weight: u64,
}

impl Edge {
    /// Creates a new edge. The edge is only checked once it is part of a
    /// [`GraphInstance`].
    pub fn new(from: usize, to: usize, weight: u64) -> Self {
        Self { from, to, weight }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.from, self.to, self.weight)
    }
}

/// A directed graph with edge capacities, as fed to the programs under test.
///
/// Parallel edges and cycles are allowed, self-loops are not.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawInstance"))]
pub struct GraphInstance {
    node_count: usize,
    edges: Vec<Edge>,
}

impl GraphInstance {
    /// The node the flow leaves from.
    pub const SOURCE: usize = 1;

    /// Creates an instance, checking every bound of the format.
    ///
    /// # Errors
    ///
    /// Returns an [`InstanceError`] describing the first violated bound.
    pub fn new(node_count: usize, edges: Vec<Edge>) -> Result<Self, InstanceError> {
        if !(1..=MAX_NODES).contains(&node_count) {
            return Err(InstanceError::NodeCount { count: node_count });
        }
        if !(1..=MAX_EDGES).contains(&edges.len()) {
            return Err(InstanceError::EdgeCount { count: edges.len() });
        }
        for (index, edge) in edges.iter().enumerate() {
            check_edge(index, edge, node_count)?;
        }
        Ok(Self { node_count, edges })
    }

    /// Creates an instance from parts that are already known to be in bounds.
    pub(crate) fn from_parts(node_count: usize, edges: Vec<Edge>) -> Self {
        debug_assert!(
            Self::new(node_count, edges.clone()).is_ok(),
            "generated instance is out of bounds"
        );
        Self { node_count, edges }
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edges, in the order they are written out.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The node the flow arrives at, which is the last node.
    #[inline]
    pub fn sink(&self) -> usize {
        self.node_count
    }
}

/// Unchecked form of [`GraphInstance`], validated on deserialization.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawInstance {
    node_count: usize,
    edges: Vec<Edge>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawInstance> for GraphInstance {
    type Error = InstanceError;

    fn try_from(raw: RawInstance) -> Result<Self, Self::Error> {
        GraphInstance::new(raw.node_count, raw.edges)
    }
}

fn check_edge(index: usize, edge: &Edge, node_count: usize) -> Result<(), InstanceError> {
    for node in [edge.from, edge.to] {
        if !(1..=node_count).contains(&node) {
            return Err(InstanceError::UnknownNode {
                index,
                node,
                node_count,
            });
        }
    }
    if edge.from == edge.to {
        return Err(InstanceError::SelfLoop {
            index,
            node: edge.from,
        });
    }
    if !(1..=MAX_WEIGHT).contains(&edge.weight) {
        return Err(InstanceError::Weight {
            index,
            weight: edge.weight,
        });
    }
    Ok(())
}

impl fmt::Display for GraphInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.node_count, self.edges.len())?;
        for edge in &self.edges {
            write!(f, "\n{edge}")?;
        }
        Ok(())
    }
}

impl FromStr for GraphInstance {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Blank lines are skipped but still count towards line numbers.
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_line, header) = lines.next().ok_or(ParseError::MissingHeader)?;
        let [node_count, declared] = parse_fields::<2>(header_line, header)?;
        let node_count = to_usize(header_line, node_count)?;
        let declared = to_usize(header_line, declared)?;

        let mut edges = Vec::with_capacity(declared.min(MAX_EDGES));
        let mut edge_lines = Vec::with_capacity(edges.capacity());
        for (line_number, line) in lines {
            let [from, to, weight] = parse_fields::<3>(line_number, line)?;
            edges.push(Edge::new(
                to_usize(line_number, from)?,
                to_usize(line_number, to)?,
                weight,
            ));
            edge_lines.push(line_number);
        }
        if edges.len() != declared {
            return Err(ParseError::EdgeCountMismatch {
                declared,
                found: edges.len(),
            });
        }

        GraphInstance::new(node_count, edges).map_err(|source| {
            let line = source
                .edge_index()
                .and_then(|index| edge_lines.get(index).copied())
                .unwrap_or(header_line);
            ParseError::Invalid { line, source }
        })
    }
}

fn parse_fields<const N: usize>(line: usize, text: &str) -> Result<[u64; N], ParseError> {
    let tokens = text.split_whitespace().collect_vec();
    if tokens.len() != N {
        return Err(ParseError::FieldCount {
            line,
            expected: N,
            found: tokens.len(),
        });
    }
    let mut fields = [0; N];
    for (field, token) in fields.iter_mut().zip(tokens) {
        *field = token.parse().map_err(|_| ParseError::InvalidInteger {
            line,
            token: token.to_string(),
        })?;
    }
    Ok(fields)
}

fn to_usize(line: usize, value: u64) -> Result<usize, ParseError> {
    usize::try_from(value).map_err(|_| ParseError::InvalidInteger {
        line,
        token: value.to_string(),
    })
}

/// A bound of the instance format that does not hold.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum InstanceError {
    /// The node count is outside `1..=MAX_NODES`.
    #[error("node count {count} is outside 1..=500")]
    NodeCount { count: usize },
    /// The edge count is outside `1..=MAX_EDGES`.
    #[error("edge count {count} is outside 1..=1000")]
    EdgeCount { count: usize },
    /// An edge endpoint does not name a node of the graph.
    #[error("edge {index} references node {node}, but the graph has {node_count} nodes")]
    UnknownNode {
        index: usize,
        node: usize,
        node_count: usize,
    },
    /// An edge starts and ends at the same node.
    #[error("edge {index} is a self-loop on node {node}")]
    SelfLoop { index: usize, node: usize },
    /// An edge capacity is outside `1..=MAX_WEIGHT`.
    #[error("edge {index} has weight {weight}, outside 1..=1000000000")]
    Weight { index: usize, weight: u64 },
}

impl InstanceError {
    /// The position of the offending edge, if the error concerns one.
    pub fn edge_index(&self) -> Option<usize> {
        match self {
            InstanceError::NodeCount { .. } | InstanceError::EdgeCount { .. } => None,
            InstanceError::UnknownNode { index, .. }
            | InstanceError::SelfLoop { index, .. }
            | InstanceError::Weight { index, .. } => Some(*index),
        }
    }
}

/// Error returned when reading an instance from text.
///
/// Line numbers are 1-based and count blank lines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ParseError {
    /// The text contains no header line.
    #[error("missing header line")]
    MissingHeader,
    /// A line has the wrong number of fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A field is not a non-negative decimal integer.
    #[error("line {line}: invalid integer '{token}'")]
    InvalidInteger { line: usize, token: String },
    /// The header disagrees with the number of edge lines.
    #[error("header declares {declared} edges but {found} edge lines follow")]
    EdgeCountMismatch { declared: usize, found: usize },
    /// The text is well formed but describes an invalid instance.
    #[error("line {line}: {source}")]
    Invalid {
        line: usize,
        #[source]
        source: InstanceError,
    },
}
