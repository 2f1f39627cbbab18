//! Node and edge records stored in a [`DependencyGraph`](crate::graph::DependencyGraph).

use serde::{Deserialize, Serialize};
use wavemap_core::model::{DependencyKind, NodeKind, RawDependency};

/// Metrics derived by the graph pipeline.
///
/// Only the pipeline writes these; callers get read access through
/// [`DependencyNode::metrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetrics {
    pub in_degree: usize,
    pub out_degree: usize,
    /// Longest discovered distance from a root.
    pub depth: usize,
    /// No incoming and no outgoing edges.
    pub is_orphan: bool,
    /// Incoming edges but no outgoing edges.
    pub is_leaf: bool,
    /// Member of a detected circular group.
    pub is_circular: bool,
    /// Index into [`DependencyGraph::circular_groups`](crate::graph::DependencyGraph::circular_groups).
    pub circular_group: Option<usize>,
}

/// One component in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    /// Source path; empty when the node was only ever referenced.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub(crate) metrics: NodeMetrics,
}

impl DependencyNode {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: NodeKind,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            path: path.into(),
            estimated_hours: None,
            metrics: NodeMetrics::default(),
        }
    }

    #[must_use]
    pub const fn metrics(&self) -> &NodeMetrics {
        &self.metrics
    }

    /// Whether this node was analyzed directly (as opposed to only referenced).
    #[must_use]
    pub fn is_analyzed(&self) -> bool {
        !self.path.is_empty()
    }

    /// Copy of this node with all derived metrics cleared.
    pub(crate) fn detached(&self) -> Self {
        Self {
            metrics: NodeMetrics::default(),
            ..self.clone()
        }
    }
}

/// Where and how a dependency was mentioned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bidirectional: Option<bool>,
}

impl From<&RawDependency> for EdgeMetadata {
    fn from(dep: &RawDependency) -> Self {
        Self {
            line: dep.line,
            expression: dep.expression.clone(),
            bidirectional: dep.bidirectional,
        }
    }
}

/// Directed edge: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,
    pub kind: DependencyKind,
    #[serde(default)]
    pub metadata: EdgeMetadata,
}

impl DependencyEdge {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            metadata: EdgeMetadata::default(),
        }
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}
