//! Dependency graph module.
//!
//! # Overview
//!
//! This module builds the component dependency graph from extractor output,
//! detects circular groups, and derives focused or filtered subgraphs. Every
//! graph, built or filtered, goes through one derivation pipeline, so the
//! metrics on a subgraph always describe the subgraph.
//!
//! ## Pipeline
//!
//! ```text
//! &[ComponentAnalysis]
//!        ↓  build::GraphBuilder::build()
//! DependencyGraph
//!   ├─ nodes (arena) + edges (discovery order)
//!   ├─ roots / leaves / orphans
//!   ├─ circular groups + cycle reports
//!   └─ GraphStats + content hash
//!        ↓  query::{focus, circular_only, without_orphans}
//! DependencyGraph (rebuilt, self-consistent)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use wavemap_graph::graph::{BuildOptions, GraphBuilder, query};
//!
//! let graph = GraphBuilder::new(BuildOptions::default()).build(&analyses);
//! let around = query::focus(&graph, "accountCard", 2)?;
//! println!("nodes={} cycles={}", around.stats().node_count, around.stats().cycle_count);
//! ```

pub mod build;
pub mod cycles;
pub mod query;
pub mod stats;
pub mod types;

pub use build::{
    BuildDiagnostics, BuildOptions, DependencyGraph, GraphBuilder, SkipReason, SkippedDependency,
};
pub use cycles::{CycleReport, SuggestedBreak, strongly_connected_components};
pub use query::{QueryError, circular_only, focus, resolve_node, without_orphans};
pub use stats::GraphStats;
pub use types::{DependencyEdge, DependencyNode, EdgeMetadata, NodeMetrics};
