//! Graph construction from component analyses.
//!
//! # Overview
//!
//! [`GraphBuilder::build`] turns a slice of [`ComponentAnalysis`] records
//! into a [`DependencyGraph`]. Construction runs in two passes: every
//! analyzed component becomes a node first, then each dependency mention is
//! normalized into an edge (creating a referenced-only node for targets that
//! were never analyzed).
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A **depends on** B". B must be converted before A.
//!
//! ## Derived Metrics
//!
//! All metrics are computed by one shared pipeline ([`finalize`]) that both
//! the builder and the query filters go through:
//!
//! ```text
//! nodes + edges
//!   ↓ adjacency + degrees
//!   ↓ cycle detection (Tarjan)      → circular groups, is_circular
//!   ↓ classification                → roots, leaves, orphans
//!   ↓ depth (longest distance)      → depth, truncation flag
//!   ↓ GraphStats + content hash
//!   ↓ cycle break reports
//! DependencyGraph
//! ```
//!
//! ## Malformed Input
//!
//! A dependency with an empty target or an unrecognized kind tag is skipped,
//! logged at `warn`, and recorded in [`BuildDiagnostics::skipped`]. The rest
//! of the build proceeds.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use wavemap_core::config::{DEFAULT_MAX_DEPTH, GraphConfig};
use wavemap_core::model::id::{display_name, infer_kind, normalize_target};
use wavemap_core::model::{ComponentAnalysis, DependencyKind, NodeKind};

use crate::graph::cycles::{CycleReport, detect_circular_groups, report_cycles_with_breaks};
use crate::graph::stats::GraphStats;
use crate::graph::types::{DependencyEdge, DependencyNode, EdgeMetadata};

// ---------------------------------------------------------------------------
// Options and diagnostics
// ---------------------------------------------------------------------------

/// Caller-controlled knobs for graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Keep dependencies on platform base components. Off by default.
    pub include_base_components: bool,
    /// Ceiling on reported depth.
    pub max_depth: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            include_base_components: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl From<&GraphConfig> for BuildOptions {
    fn from(config: &GraphConfig) -> Self {
        Self {
            include_base_components: config.include_base_components,
            max_depth: config.max_depth,
        }
    }
}

/// Why a dependency mention was left out of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    EmptyTarget,
    UnrecognizedKind,
}

impl SkipReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyTarget => "empty target",
            Self::UnrecognizedKind => "unrecognized dependency kind",
        }
    }
}

/// A dependency mention the builder refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDependency {
    pub component: String,
    pub target: String,
    pub kind: DependencyKind,
    pub reason: SkipReason,
}

/// Everything the builder noticed but did not fail on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDiagnostics {
    pub skipped: Vec<SkippedDependency>,
    /// Dependencies on base components dropped because they were excluded.
    pub base_references_dropped: usize,
    /// Identifiers analyzed more than once. The first analysis supplied the
    /// node record; dependencies from every analysis were kept.
    pub duplicate_components: Vec<String>,
    /// Analyses with a blank identifier, ignored entirely.
    pub unnamed_components: usize,
    /// Depth traversal hit [`BuildOptions::max_depth`].
    pub depth_truncated: bool,
}

impl BuildDiagnostics {
    /// Whether anything at all was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
            && self.duplicate_components.is_empty()
            && self.unnamed_components == 0
            && !self.depth_truncated
    }

    /// Copy for a derived graph: build-time findings carry over, traversal
    /// findings are recomputed.
    pub(crate) fn carried(&self) -> Self {
        Self {
            depth_truncated: false,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// DependencyGraph
// ---------------------------------------------------------------------------

/// A fully derived dependency graph.
///
/// Nodes live in an arena (`Vec`) addressed by index, with an id → index map
/// for lookups. Edges are plain `(from, to)` id pairs kept in discovery
/// order. Every derived field is produced by the pipeline; nothing here is
/// mutable from outside the crate.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<DependencyNode>,
    index: HashMap<String, usize>,
    edges: Vec<DependencyEdge>,
    endpoints: Vec<(usize, usize)>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
    roots: Vec<String>,
    leaves: Vec<String>,
    orphans: Vec<String>,
    circular_groups: Vec<Vec<String>>,
    group_indices: Vec<Vec<usize>>,
    cycle_reports: Vec<CycleReport>,
    stats: GraphStats,
    diagnostics: BuildDiagnostics,
    options: BuildOptions,
    content_hash: String,
}

impl DependencyGraph {
    /// Nodes in arena (discovery) order.
    #[must_use]
    pub fn nodes(&self) -> &[DependencyNode] {
        &self.nodes
    }

    /// Nodes sorted by kind, then display name, then identifier.
    #[must_use]
    pub fn nodes_sorted(&self) -> Vec<&DependencyNode> {
        let mut sorted: Vec<&DependencyNode> = self.nodes.iter().collect();
        sorted.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });
        sorted
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Edges in discovery order.
    #[must_use]
    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distinct identifiers `id` depends on, in edge discovery order.
    #[must_use]
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, &self.outgoing)
    }

    /// Distinct identifiers depending on `id`, in edge discovery order.
    #[must_use]
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, &self.incoming)
    }

    fn neighbor_ids<'a>(&'a self, id: &str, adjacency: &'a [Vec<usize>]) -> Vec<&'a str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut seen: Vec<usize> = Vec::with_capacity(adjacency[idx].len());
        for &next in &adjacency[idx] {
            if !seen.contains(&next) {
                seen.push(next);
            }
        }
        seen.into_iter().map(|i| self.nodes[i].id.as_str()).collect()
    }

    /// Identifiers with no incoming and at least one outgoing edge, sorted.
    #[must_use]
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Identifiers with incoming but no outgoing edges, sorted.
    #[must_use]
    pub fn leaves(&self) -> &[String] {
        &self.leaves
    }

    /// Identifiers with no edges at all, sorted.
    #[must_use]
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    /// Circular groups, members sorted within each group and groups sorted
    /// by their member lists.
    #[must_use]
    pub fn circular_groups(&self) -> &[Vec<String>] {
        &self.circular_groups
    }

    /// Members of the circular group containing `id`, if any.
    #[must_use]
    pub fn group_members(&self, id: &str) -> Option<&[String]> {
        self.node(id)
            .and_then(|n| n.metrics().circular_group)
            .map(|g| self.circular_groups[g].as_slice())
    }

    /// One report per circular group, in group order.
    #[must_use]
    pub fn cycle_reports(&self) -> &[CycleReport] {
        &self.cycle_reports
    }

    #[must_use]
    pub const fn stats(&self) -> &GraphStats {
        &self.stats
    }

    #[must_use]
    pub const fn diagnostics(&self) -> &BuildDiagnostics {
        &self.diagnostics
    }

    #[must_use]
    pub const fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// BLAKE3 fingerprint of the sorted node and edge set.
    ///
    /// Independent of input order: two builds over permutations of the same
    /// analyses hash identically.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub(crate) fn outgoing(&self) -> &[Vec<usize>] {
        &self.outgoing
    }

    pub(crate) fn incoming(&self) -> &[Vec<usize>] {
        &self.incoming
    }

    pub(crate) fn endpoints(&self) -> &[(usize, usize)] {
        &self.endpoints
    }

    pub(crate) fn circular_group_indices(&self) -> &[Vec<usize>] {
        &self.group_indices
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Builds a [`DependencyGraph`] from extractor output.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

impl GraphBuilder {
    #[must_use]
    pub const fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Build the graph.
    ///
    /// Input order does not affect any sorted output (roots, leaves, groups,
    /// sorted node lists, content hash). Edge discovery order follows input
    /// order.
    #[must_use]
    #[instrument(skip_all, fields(components = analyses.len(), include_base = self.options.include_base_components))]
    pub fn build(&self, analyses: &[ComponentAnalysis]) -> DependencyGraph {
        let mut diagnostics = BuildDiagnostics::default();
        let mut nodes: Vec<DependencyNode> = Vec::with_capacity(analyses.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(analyses.len());

        // Pass 1: every analyzed component exists before any edge is added.
        for analysis in analyses {
            let Some(id) = analysis.normalized_id() else {
                warn!(path = %analysis.path, id = %analysis.id, "ignoring analysis with blank identifier");
                diagnostics.unnamed_components += 1;
                continue;
            };
            if index.contains_key(&id) {
                warn!(%id, "component analyzed more than once; keeping first record");
                diagnostics.duplicate_components.push(id);
                continue;
            }

            let mut node = DependencyNode::new(
                id.as_str(),
                analysis.resolved_name(),
                analysis.resolved_kind(),
                analysis.path.clone(),
            );
            node.estimated_hours = analysis.estimated_hours;
            index.insert(id, nodes.len());
            nodes.push(node);
        }

        // Pass 2: normalize mentions into edges.
        let mut edges: Vec<DependencyEdge> = Vec::new();
        for analysis in analyses {
            let Some(from) = analysis.normalized_id() else {
                continue;
            };
            let from = from.as_str();

            for dep in &analysis.dependencies {
                if !dep.kind.is_recognized() {
                    diagnostics.skip(from, &dep.target, dep.kind, SkipReason::UnrecognizedKind);
                    continue;
                }
                let Some(to) = normalize_target(&dep.target, dep.kind) else {
                    diagnostics.skip(from, &dep.target, dep.kind, SkipReason::EmptyTarget);
                    continue;
                };
                if !self.options.include_base_components && is_base_reference(&to, dep.kind) {
                    diagnostics.base_references_dropped += 1;
                    continue;
                }

                if !index.contains_key(&to) {
                    index.insert(to.clone(), nodes.len());
                    nodes.push(DependencyNode::new(
                        to.as_str(),
                        display_name(&to),
                        infer_kind(&to),
                        "",
                    ));
                }

                edges.push(DependencyEdge {
                    metadata: EdgeMetadata::from(dep),
                    ..DependencyEdge::new(from, to, dep.kind)
                });
            }
        }

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            skipped = diagnostics.skipped.len(),
            base_dropped = diagnostics.base_references_dropped,
            "graph assembled"
        );

        finalize(nodes, edges, self.options, diagnostics)
    }
}

impl BuildDiagnostics {
    fn skip(&mut self, component: &str, target: &str, kind: DependencyKind, reason: SkipReason) {
        warn!(component, target, %kind, reason = reason.as_str(), "skipping dependency");
        self.skipped.push(SkippedDependency {
            component: component.to_string(),
            target: target.to_string(),
            kind,
            reason,
        });
    }
}

fn is_base_reference(target: &str, kind: DependencyKind) -> bool {
    kind == DependencyKind::BaseComponent || infer_kind(target) == NodeKind::BaseComponent
}

// ---------------------------------------------------------------------------
// Shared derivation pipeline
// ---------------------------------------------------------------------------

/// Derive every metric and view for a node/edge set.
///
/// `nodes` must have unique identifiers and carry default metrics. Edges
/// whose endpoints are not in `nodes` are dropped.
pub(crate) fn finalize(
    mut nodes: Vec<DependencyNode>,
    edges: Vec<DependencyEdge>,
    options: BuildOptions,
    mut diagnostics: BuildDiagnostics,
) -> DependencyGraph {
    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id.clone(), i))
        .collect();

    let mut kept_edges: Vec<DependencyEdge> = Vec::with_capacity(edges.len());
    let mut endpoints: Vec<(usize, usize)> = Vec::with_capacity(edges.len());
    for edge in edges {
        match (index.get(&edge.from), index.get(&edge.to)) {
            (Some(&from), Some(&to)) => {
                endpoints.push((from, to));
                kept_edges.push(edge);
            }
            _ => debug!(from = %edge.from, to = %edge.to, "dropping edge with unknown endpoint"),
        }
    }

    let n = nodes.len();
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut incoming: Vec<Vec<usize>> = vec![Vec::new(); n];
    for &(from, to) in &endpoints {
        outgoing[from].push(to);
        incoming[to].push(from);
    }

    for (i, node) in nodes.iter_mut().enumerate() {
        node.metrics.in_degree = incoming[i].len();
        node.metrics.out_degree = outgoing[i].len();
    }

    // Cycle marking.
    let ids: Vec<String> = nodes.iter().map(|node| node.id.clone()).collect();
    let group_indices = detect_circular_groups(&outgoing, &ids);
    let mut group_of: Vec<Option<usize>> = vec![None; n];
    for (g, members) in group_indices.iter().enumerate() {
        for &member in members {
            group_of[member] = Some(g);
            nodes[member].metrics.is_circular = true;
            nodes[member].metrics.circular_group = Some(g);
        }
    }
    let circular_groups: Vec<Vec<String>> = group_indices
        .iter()
        .map(|members| members.iter().map(|&i| ids[i].clone()).collect())
        .collect();

    // Classification, from final degrees.
    let mut roots: Vec<String> = Vec::new();
    let mut leaves: Vec<String> = Vec::new();
    let mut orphans: Vec<String> = Vec::new();
    let mut root_indices: Vec<usize> = Vec::new();
    for (i, node) in nodes.iter_mut().enumerate() {
        let (inn, out) = (node.metrics.in_degree, node.metrics.out_degree);
        node.metrics.is_orphan = inn == 0 && out == 0;
        node.metrics.is_leaf = inn > 0 && out == 0;
        if node.metrics.is_orphan {
            orphans.push(node.id.clone());
        } else if node.metrics.is_leaf {
            leaves.push(node.id.clone());
        } else if inn == 0 {
            roots.push(node.id.clone());
            root_indices.push(i);
        }
    }
    roots.sort_unstable();
    leaves.sort_unstable();
    orphans.sort_unstable();

    let (depths, truncated) = compute_depths(
        &outgoing,
        &group_of,
        &group_indices,
        &root_indices,
        options.max_depth,
    );
    for (node, depth) in nodes.iter_mut().zip(depths) {
        node.metrics.depth = depth;
    }
    if truncated {
        warn!(max_depth = options.max_depth, "depth traversal reached ceiling; depth capped");
        diagnostics.depth_truncated = true;
    }

    let stats = GraphStats::compute(&nodes, &kept_edges, &endpoints, group_indices.len());
    let content_hash = compute_content_hash(&nodes, &kept_edges);

    let mut graph = DependencyGraph {
        nodes,
        index,
        edges: kept_edges,
        endpoints,
        outgoing,
        incoming,
        roots,
        leaves,
        orphans,
        circular_groups,
        group_indices,
        cycle_reports: Vec::new(),
        stats,
        diagnostics,
        options,
        content_hash,
    };
    graph.cycle_reports = report_cycles_with_breaks(&graph);

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        cycles = graph.circular_groups.len(),
        max_depth = graph.stats.max_depth,
        "graph derived"
    );
    graph
}

/// Longest distance from any source, by BFS relaxation.
///
/// Sources are the roots, or every node when there are none. Edges inside a
/// circular group are ignored and a group's members always share one depth,
/// so the relaxation runs over the (acyclic) condensation. Distances beyond
/// `max_depth` are not propagated; the second return value reports whether
/// that happened.
fn compute_depths(
    outgoing: &[Vec<usize>],
    group_of: &[Option<usize>],
    groups: &[Vec<usize>],
    roots: &[usize],
    max_depth: usize,
) -> (Vec<usize>, bool) {
    let n = outgoing.len();
    let mut depth = vec![0usize; n];
    let mut truncated = false;

    let mut queue: VecDeque<usize> = if roots.is_empty() {
        (0..n).collect()
    } else {
        roots.iter().copied().collect()
    };

    while let Some(node) = queue.pop_front() {
        let candidate = depth[node] + 1;
        for &next in &outgoing[node] {
            if group_of[node].is_some() && group_of[node] == group_of[next] {
                continue;
            }
            if candidate > max_depth {
                truncated = true;
                continue;
            }

            let targets: &[usize] = match group_of[next] {
                Some(g) => &groups[g],
                None => std::slice::from_ref(&next),
            };
            for &target in targets {
                if candidate > depth[target] {
                    depth[target] = candidate;
                    queue.push_back(target);
                }
            }
        }
    }

    (depth, truncated)
}

/// BLAKE3 over the sorted node and edge records.
fn compute_content_hash(nodes: &[DependencyNode], edges: &[DependencyEdge]) -> String {
    let mut node_keys: Vec<(&str, &str, &str, &str)> = nodes
        .iter()
        .map(|n| (n.id.as_str(), n.kind.as_str(), n.name.as_str(), n.path.as_str()))
        .collect();
    node_keys.sort_unstable();

    let mut edge_keys: Vec<(&str, &str, &str)> = edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.kind.as_str()))
        .collect();
    edge_keys.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for (id, kind, name, path) in node_keys {
        for field in [id, kind, name, path] {
            hasher.update(field.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\n");
    }
    hasher.update(b"\x01");
    for (from, to, kind) in edge_keys {
        for field in [from, to, kind] {
            hasher.update(field.as_bytes());
            hasher.update(b"\x00");
        }
        hasher.update(b"\n");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
