//! Aggregate statistics for a dependency graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: totals, with per-kind breakdowns in
//!   `nodes_by_kind` and `edges_by_kind`.
//! - **max_depth**: deepest node depth after the depth pass.
//! - **average_connectivity**: mean number of edges touching a node,
//!   `2 * edge_count / node_count`. Zero for an empty graph.
//! - **cycle_count**: number of circular groups, self-loops included.
//! - **orphan_count**, **root_count**, **leaf_count**: classification totals.
//! - **max_in_degree** / **max_out_degree**.
//! - **density**: `edge_count / (node_count * (node_count - 1))`. Zero for
//!   graphs with 0 or 1 node. Parallel edges of different kinds can push
//!   this above 1.0.
//! - **weakly_connected_component_count**: disjoint subgraphs when edge
//!   direction is ignored. Every orphan is its own component.
//!
//! Stats are only ever produced by the graph pipeline, so a filtered graph
//! always carries stats for exactly the nodes and edges it holds.

use std::collections::BTreeMap;

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use wavemap_core::model::{DependencyKind, NodeKind};

use crate::graph::types::{DependencyEdge, DependencyNode};

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a [`DependencyGraph`](crate::graph::DependencyGraph).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_kind: BTreeMap<NodeKind, usize>,
    pub edges_by_kind: BTreeMap<DependencyKind, usize>,
    pub max_depth: usize,
    pub average_connectivity: f64,
    pub cycle_count: usize,
    pub orphan_count: usize,
    pub root_count: usize,
    pub leaf_count: usize,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub density: f64,
    pub weakly_connected_component_count: usize,
}

impl GraphStats {
    /// Compute statistics from finalized nodes and their resolved edges.
    ///
    /// `endpoints[i]` holds the arena indices of `edges[i]`.
    #[must_use]
    pub(crate) fn compute(
        nodes: &[DependencyNode],
        edges: &[DependencyEdge],
        endpoints: &[(usize, usize)],
        cycle_count: usize,
    ) -> Self {
        let node_count = nodes.len();
        let edge_count = edges.len();

        let mut nodes_by_kind: BTreeMap<NodeKind, usize> = BTreeMap::new();
        for node in nodes {
            *nodes_by_kind.entry(node.kind).or_default() += 1;
        }

        let mut edges_by_kind: BTreeMap<DependencyKind, usize> = BTreeMap::new();
        for edge in edges {
            *edges_by_kind.entry(edge.kind).or_default() += 1;
        }

        let metrics = || nodes.iter().map(DependencyNode::metrics);

        Self {
            node_count,
            edge_count,
            nodes_by_kind,
            edges_by_kind,
            max_depth: metrics().map(|m| m.depth).max().unwrap_or(0),
            average_connectivity: compute_connectivity(node_count, edge_count),
            cycle_count,
            orphan_count: metrics().filter(|m| m.is_orphan).count(),
            root_count: metrics()
                .filter(|m| m.in_degree == 0 && m.out_degree > 0)
                .count(),
            leaf_count: metrics().filter(|m| m.is_leaf).count(),
            max_in_degree: metrics().map(|m| m.in_degree).max().unwrap_or(0),
            max_out_degree: metrics().map(|m| m.out_degree).max().unwrap_or(0),
            density: compute_density(node_count, edge_count),
            weakly_connected_component_count: count_weak_components(node_count, endpoints),
        }
    }

    /// Whether the graph contains at least one circular group.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.cycle_count > 0
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count <= 1 {
        return 0.0;
    }
    let max_edges = node_count * (node_count - 1);
    edge_count as f64 / max_edges as f64
}

#[allow(clippy::cast_precision_loss)]
fn compute_connectivity(node_count: usize, edge_count: usize) -> f64 {
    if node_count == 0 {
        return 0.0;
    }
    (2 * edge_count) as f64 / node_count as f64
}

fn count_weak_components(node_count: usize, endpoints: &[(usize, usize)]) -> usize {
    let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(node_count, endpoints.len());
    for _ in 0..node_count {
        graph.add_node(());
    }
    for &(from, to) in endpoints {
        graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
    }
    connected_components(&graph)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
