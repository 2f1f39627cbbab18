//! Focus subgraphs and graph filters.
//!
//! Every function here returns a fresh [`DependencyGraph`] rebuilt through
//! the same derivation pipeline as [`GraphBuilder::build`](crate::graph::GraphBuilder::build):
//! degrees, depth, circular groups, classification, and stats describe the
//! subgraph itself, not the graph it was cut from.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument};
use wavemap_core::model::NodeKind;
use wavemap_core::model::id::make_id;

use crate::graph::build::{DependencyGraph, finalize};

/// Failure of a graph query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("no component matches '{query}'")]
    FocusNotFound { query: String },
}

/// Resolve free-form text to a node identifier.
///
/// Tries, in order:
/// 1. an exact identifier match;
/// 2. the text as a name under each kind's prefix, in [`NodeKind::ALL`]
///    order (`card` → `c:card`, then `page:card`, ...);
/// 3. a case-insensitive suffix match on the identifier. When several
///    nodes match, one whose name equals the text wins, then the lowest
///    kind, then the lowest identifier.
#[must_use]
pub fn resolve_node<'a>(graph: &'a DependencyGraph, query: &str) -> Option<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(node) = graph.node(query) {
        return Some(node.id.as_str());
    }

    for kind in NodeKind::ALL {
        if let Some(node) = graph.node(&make_id(kind, query)) {
            return Some(node.id.as_str());
        }
    }

    let needle = query.to_lowercase();
    let mut candidates: Vec<_> = graph
        .nodes()
        .iter()
        .filter(|node| node.id.to_lowercase().ends_with(&needle))
        .collect();
    if candidates.len() > 1 {
        debug!(query, matches = candidates.len(), "ambiguous suffix match");
    }
    candidates.sort_by(|a, b| {
        let a_exact = a.name.to_lowercase() != needle;
        let b_exact = b.name.to_lowercase() != needle;
        a_exact
            .cmp(&b_exact)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.id.cmp(&b.id))
    });
    candidates.first().map(|node| node.id.as_str())
}

/// Bidirectional neighborhood of `query`, up to `max_depth` hops.
///
/// Follows both "depends on" and "depended on by" edges. A `max_depth` of 0
/// means unlimited, which yields the whole weakly connected component.
///
/// # Errors
///
/// Returns [`QueryError::FocusNotFound`] if `query` resolves to no node.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn focus(
    graph: &DependencyGraph,
    query: &str,
    max_depth: usize,
) -> Result<DependencyGraph, QueryError> {
    let start = resolve_node(graph, query)
        .and_then(|id| graph.index_of(id))
        .ok_or_else(|| QueryError::FocusNotFound {
            query: query.to_string(),
        })?;

    let mut visited = FixedBitSet::with_capacity(graph.node_count());
    let mut queue: VecDeque<(usize, usize)> = VecDeque::from([(start, 0)]);
    visited.insert(start);

    while let Some((node, distance)) = queue.pop_front() {
        if max_depth != 0 && distance >= max_depth {
            continue;
        }
        let neighbors = graph.outgoing()[node]
            .iter()
            .chain(&graph.incoming()[node]);
        for &next in neighbors {
            if !visited.contains(next) {
                visited.insert(next);
                queue.push_back((next, distance + 1));
            }
        }
    }

    debug!(
        focus = %graph.nodes()[start].id,
        kept = visited.count_ones(..),
        "focus neighborhood collected"
    );
    Ok(subgraph(graph, &visited))
}

/// Only the nodes in circular groups, and the edges among them.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn circular_only(graph: &DependencyGraph) -> DependencyGraph {
    let keep = select(graph, |idx| graph.nodes()[idx].metrics().is_circular);
    subgraph(graph, &keep)
}

/// Every node except orphans. Edges are unaffected.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn without_orphans(graph: &DependencyGraph) -> DependencyGraph {
    let keep = select(graph, |idx| !graph.nodes()[idx].metrics().is_orphan);
    subgraph(graph, &keep)
}

fn select(graph: &DependencyGraph, predicate: impl Fn(usize) -> bool) -> FixedBitSet {
    let mut keep = FixedBitSet::with_capacity(graph.node_count());
    for idx in (0..graph.node_count()).filter(|&idx| predicate(idx)) {
        keep.insert(idx);
    }
    keep
}

/// Rebuild the graph induced by `keep`: kept nodes in arena order, and every
/// edge with both endpoints kept, in discovery order.
fn subgraph(graph: &DependencyGraph, keep: &FixedBitSet) -> DependencyGraph {
    let nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .filter(|(idx, _)| keep.contains(*idx))
        .map(|(_, node)| node.detached())
        .collect();

    let edges = graph
        .edges()
        .iter()
        .zip(graph.endpoints())
        .filter(|(_, (from, to))| keep.contains(*from) && keep.contains(*to))
        .map(|(edge, _)| edge.clone())
        .collect();

    finalize(nodes, edges, *graph.options(), graph.diagnostics().carried())
}
