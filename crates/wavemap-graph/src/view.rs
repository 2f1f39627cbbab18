//! Serializable read-only views for presentation layers.
//!
//! [`GraphView`] flattens a [`DependencyGraph`] into the shape renderers and
//! JSON consumers read: nodes sorted by kind then name, edges in discovery
//! order, circular groups, stats, and the content hash. The order result
//! ([`ConversionOrderResult`](crate::order::ConversionOrderResult)) is
//! already serializable and needs no view.

use serde::{Deserialize, Serialize};
use wavemap_core::model::NodeKind;

use crate::graph::{DependencyEdge, DependencyGraph, DependencyNode, GraphStats};

/// One node with its metrics flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    pub in_degree: usize,
    pub out_degree: usize,
    pub depth: usize,
    pub is_leaf: bool,
    pub is_orphan: bool,
    pub is_circular: bool,
    /// Members of this node's circular group, empty when not circular.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub circular_group: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
}

impl NodeView {
    fn from_node(node: &DependencyNode, graph: &DependencyGraph) -> Self {
        let m = node.metrics();
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            path: node.path.clone(),
            in_degree: m.in_degree,
            out_degree: m.out_degree,
            depth: m.depth,
            is_leaf: m.is_leaf,
            is_orphan: m.is_orphan,
            is_circular: m.is_circular,
            circular_group: graph
                .group_members(&node.id)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            estimated_hours: node.estimated_hours,
        }
    }
}

/// The complete graph as presentation layers consume it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<DependencyEdge>,
    pub circular_groups: Vec<Vec<String>>,
    pub stats: GraphStats,
    pub content_hash: String,
}

impl From<&DependencyGraph> for GraphView {
    fn from(graph: &DependencyGraph) -> Self {
        Self {
            nodes: graph
                .nodes_sorted()
                .into_iter()
                .map(|node| NodeView::from_node(node, graph))
                .collect(),
            edges: graph.edges().to_vec(),
            circular_groups: graph.circular_groups().to_vec(),
            stats: graph.stats().clone(),
            content_hash: graph.content_hash().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{BuildOptions, GraphBuilder};
    use wavemap_core::model::{ComponentAnalysis, DependencyKind};

    #[test]
    fn nodes_sorted_by_kind_then_name() {
        let graph = GraphBuilder::new(BuildOptions::default()).build(&[
            ComponentAnalysis::new("page:Home").depends_on("c:zeta", DependencyKind::ComponentReference),
            ComponentAnalysis::new("c:alpha").depends_on("Ctrl", DependencyKind::ControllerBinding),
        ]);
        let view = GraphView::from(&graph);
        let ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c:alpha", "c:zeta", "page:Home", "controller:Ctrl"]);
        assert_eq!(view.edges[0].from, "page:Home");
    }

    #[test]
    fn circular_members_are_listed_on_each_node() {
        let graph = GraphBuilder::new(BuildOptions::default()).build(&[
            ComponentAnalysis::new("c:p").depends_on("c:q", DependencyKind::Event),
            ComponentAnalysis::new("c:q").depends_on("c:p", DependencyKind::Event),
            ComponentAnalysis::new("c:r"),
        ]);
        let view = GraphView::from(&graph);
        let p = view.nodes.iter().find(|n| n.id == "c:p").expect("p");
        assert_eq!(p.circular_group, vec!["c:p".to_string(), "c:q".to_string()]);
        let r = view.nodes.iter().find(|n| n.id == "c:r").expect("r");
        assert!(r.circular_group.is_empty());
    }

    #[test]
    fn view_round_trips_through_json() {
        let graph = GraphBuilder::new(BuildOptions::default()).build(&[ComponentAnalysis::new("c:a")
            .with_estimate(3.0)
            .depends_on("c:b", DependencyKind::Event)]);
        let view = GraphView::from(&graph);
        let json = serde_json::to_string(&view).expect("serialize");
        let back: GraphView = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, view);
    }
}
