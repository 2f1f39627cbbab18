//! Circular dependency detection.
//!
//! # Algorithm
//!
//! Tarjan's strongly-connected-components algorithm over the node arena's
//! adjacency lists, run with an explicit call stack so that recursion depth
//! never tracks graph depth. Nodes are visited in arena order and neighbors
//! in edge discovery order, so the same input always produces the same
//! components.
//!
//! A *circular group* is an SCC with two or more members, or a single node
//! that has an edge to itself.
//!
//! # Ordering
//!
//! Members inside a group are sorted by identifier, and groups are sorted by
//! their member lists. Both orders are independent of input order.

#![allow(clippy::module_name_repetitions)]

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;

const UNVISITED: usize = usize::MAX;

/// Strongly connected components of the graph described by `adjacency`.
///
/// `adjacency[v]` lists the targets of `v`'s outgoing edges. Every node
/// appears in exactly one returned component. Components come out in the
/// order Tarjan's algorithm completes them (reverse topological order of
/// the condensation); members are in stack-pop order.
#[must_use]
pub fn strongly_connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut index = vec![UNVISITED; n];
    let mut low_link = vec![0usize; n];
    let mut on_stack = FixedBitSet::with_capacity(n);
    let mut stack: Vec<usize> = Vec::new();
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut next_index = 0usize;

    // Each frame: (node, position of the next neighbor to explore).
    let mut call_stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..n {
        if index[start] != UNVISITED {
            continue;
        }

        index[start] = next_index;
        low_link[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack.insert(start);
        call_stack.push((start, 0));

        while let Some(frame) = call_stack.last_mut() {
            let node = frame.0;

            if let Some(&next) = adjacency[node].get(frame.1) {
                frame.1 += 1;

                if index[next] == UNVISITED {
                    index[next] = next_index;
                    low_link[next] = next_index;
                    next_index += 1;
                    stack.push(next);
                    on_stack.insert(next);
                    call_stack.push((next, 0));
                } else if on_stack.contains(next) {
                    low_link[node] = low_link[node].min(index[next]);
                }
                continue;
            }

            // All neighbors explored: retire the frame.
            call_stack.pop();
            if let Some(&(parent, _)) = call_stack.last() {
                low_link[parent] = low_link[parent].min(low_link[node]);
            }

            if low_link[node] == index[node] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack.set(member, false);
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    components
}

/// Circular groups as sorted lists of node indices, sorted by identifier.
///
/// Self-loops count: a node with an edge to itself forms a one-member group.
#[must_use]
pub(crate) fn detect_circular_groups(adjacency: &[Vec<usize>], ids: &[String]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = strongly_connected_components(adjacency)
        .into_iter()
        .filter(|component| match component.as_slice() {
            [single] => adjacency[*single].contains(single),
            members => members.len() > 1,
        })
        .map(|mut component| {
            component.sort_unstable_by(|a, b| ids[*a].cmp(&ids[*b]));
            component
        })
        .collect();

    groups.sort_unstable_by(|a, b| {
        a.iter()
            .map(|idx| ids[*idx].as_str())
            .cmp(b.iter().map(|idx| ids[*idx].as_str()))
    });
    groups
}

// ---------------------------------------------------------------------------
// Cycle break suggestions
// ---------------------------------------------------------------------------

/// An edge whose removal helps break a cycle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SuggestedBreak {
    pub from: String,
    pub to: String,
}

/// A detected circular group with suggested edges to remove to break it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Sorted identifiers of the group's members.
    pub members: Vec<String>,
    /// Back-edges found by a DFS inside the group. Removing all of them makes
    /// the group acyclic; usually one is enough.
    pub suggested_breaks: Vec<SuggestedBreak>,
}

/// Report every circular group in `graph` with suggested cycle breaks.
#[must_use]
pub fn report_cycles_with_breaks(graph: &DependencyGraph) -> Vec<CycleReport> {
    let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id.as_str()).collect();

    graph
        .circular_group_indices()
        .iter()
        .map(|component| {
            let members: Vec<String> = component.iter().map(|&idx| ids[idx].to_string()).collect();

            if let [single] = component.as_slice() {
                let id = ids[*single];
                let suggested_breaks = graph
                    .edges()
                    .iter()
                    .filter(|edge| edge.is_self_loop() && edge.from == id)
                    .take(1)
                    .map(|edge| SuggestedBreak {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                    })
                    .collect();
                return CycleReport {
                    members,
                    suggested_breaks,
                };
            }

            let suggested_breaks = find_back_edges(graph.outgoing(), &ids, component);
            CycleReport {
                members,
                suggested_breaks,
            }
        })
        .collect()
}

/// Collect back-edges of an iterative DFS restricted to `component`.
///
/// The DFS starts at the smallest identifier and visits neighbors in
/// identifier order so the suggestions do not depend on input order.
fn find_back_edges(
    adjacency: &[Vec<usize>],
    ids: &[&str],
    component: &[usize],
) -> Vec<SuggestedBreak> {
    let mut members = FixedBitSet::with_capacity(adjacency.len());
    for &idx in component {
        members.insert(idx);
    }

    let sorted_neighbors = |node: usize| -> Vec<usize> {
        let mut next: Vec<usize> = adjacency[node]
            .iter()
            .copied()
            .filter(|n| members.contains(*n))
            .collect();
        next.sort_unstable_by(|a, b| ids[*a].cmp(ids[*b]));
        next.dedup();
        next
    };

    let mut starts: Vec<usize> = component.to_vec();
    starts.sort_unstable_by(|a, b| ids[*a].cmp(ids[*b]));

    let mut visited = FixedBitSet::with_capacity(adjacency.len());
    let mut on_path = FixedBitSet::with_capacity(adjacency.len());
    let mut back_edges: Vec<SuggestedBreak> = Vec::new();
    let mut call_stack: Vec<(usize, Vec<usize>, usize)> = Vec::new();

    for start in starts {
        if visited.contains(start) {
            continue;
        }
        visited.insert(start);
        on_path.insert(start);
        call_stack.push((start, sorted_neighbors(start), 0));

        while let Some(frame) = call_stack.last_mut() {
            let current = frame.0;
            if let Some(&neighbor) = frame.1.get(frame.2) {
                frame.2 += 1;
                if on_path.contains(neighbor) {
                    back_edges.push(SuggestedBreak {
                        from: ids[current].to_string(),
                        to: ids[neighbor].to_string(),
                    });
                } else if !visited.contains(neighbor) {
                    visited.insert(neighbor);
                    on_path.insert(neighbor);
                    call_stack.push((neighbor, sorted_neighbors(neighbor), 0));
                }
            } else {
                call_stack.pop();
                on_path.set(current, false);
            }
        }
    }

    back_edges.sort_unstable();
    back_edges.dedup();
    back_edges
}
