#![forbid(unsafe_code)]
//! wavemap-graph library.
//!
//! Dependency graph construction, circular-group detection, focus and filter
//! queries, and conversion-wave scheduling over component analyses.
//!
//! Every entry point is a pure function of its input: nothing is cached or
//! persisted between calls, and each returns a freshly built value.
//!
//! # Modules
//!
//! - [`graph`]: builder, cycle detection, queries, stats.
//! - [`order`]: conversion-wave scheduling.
//! - [`view`]: serializable views for renderers.

pub mod graph;
pub mod order;
pub mod view;

pub use graph::{BuildOptions, DependencyGraph, GraphBuilder, GraphStats, QueryError};
pub use order::{ConversionOrderResult, ConversionWave, compute_conversion_order};
pub use view::{GraphView, NodeView};
