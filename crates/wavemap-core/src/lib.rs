#![forbid(unsafe_code)]
//! wavemap-core library.
//!
//! The component model shared by the graph engine and the CLI: node and
//! dependency kinds, identifier normalization, the extractor input contract,
//! error codes, and configuration.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types where appropriate;
//!   `thiserror` enums for errors callers are expected to match on.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod model;

pub use error::ErrorCode;
pub use model::{ComponentAnalysis, DependencyKind, NodeKind, RawDependency};
