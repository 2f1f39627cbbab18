//! The input contract between source extractors and the graph engine.
//!
//! - [`kind`]: closed enumerations of node and dependency kinds.
//! - [`id`]: identifier parsing, kind inference, and target normalization.
//! - [`analysis`]: per-component extraction results and file loading.

pub mod analysis;
pub mod id;
pub mod kind;

pub use analysis::{ComponentAnalysis, InputError, RawDependency, load_analyses, parse_analyses};
pub use kind::{DependencyKind, NodeKind, ParseKindError};
