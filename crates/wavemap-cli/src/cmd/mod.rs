//! Subcommand handlers.
//!
//! Every command reads one extractor output file, builds a
//! [`DependencyGraph`], and renders a view of it in the resolved
//! [`OutputMode`].

pub mod cycles;
pub mod focus;
pub mod graph;
pub mod order;
pub mod stats;

use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};
use wavemap_core::ErrorCode;
use wavemap_core::config::ProjectConfig;
use wavemap_core::model::{InputError, load_analyses};
use wavemap_graph::{BuildOptions, DependencyGraph, GraphBuilder};

use crate::output::{CliError, OutputMode, render_error};

/// Per-invocation settings shared by all commands.
#[derive(Debug, Clone)]
pub struct Context {
    pub output: OutputMode,
    pub project: ProjectConfig,
}

/// Where the component analyses come from and how to read them.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Extractor output: a JSON array of component analyses.
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Keep references to platform base components (lightning:, ui:, ...).
    #[arg(long)]
    pub include_base: bool,
}

impl SourceArgs {
    /// Builder options from project config, with CLI overrides applied.
    pub fn build_options(&self, project: &ProjectConfig) -> BuildOptions {
        let mut options = BuildOptions::from(&project.graph);
        if self.include_base {
            options.include_base_components = true;
        }
        options
    }
}

/// Load the analyses named by `source` and build the graph.
///
/// Read and parse failures are rendered to stderr before being returned.
pub fn load_graph(source: &SourceArgs, ctx: &Context) -> anyhow::Result<DependencyGraph> {
    let analyses = match load_analyses(&source.input) {
        Ok(analyses) => analyses,
        Err(e) => {
            let code = match e {
                InputError::Read { .. } => ErrorCode::InputNotFound,
                InputError::Parse { .. } => ErrorCode::InputParseError,
            };
            render_error(ctx.output, &CliError::from_code(code, e.to_string()))?;
            return Err(anyhow::Error::new(e).context(code.message()));
        }
    };

    let graph = GraphBuilder::new(source.build_options(&ctx.project)).build(&analyses);

    let diagnostics = graph.diagnostics();
    if !diagnostics.is_clean() {
        warn!(
            skipped = diagnostics.skipped.len(),
            duplicates = diagnostics.duplicate_components.len(),
            unnamed = diagnostics.unnamed_components,
            depth_truncated = diagnostics.depth_truncated,
            "input had problems; see `wavemap stats` for details"
        );
    }
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built dependency graph"
    );

    Ok(graph)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// A small bundle set with one mutual reference and one controller.
    pub const SAMPLE: &str = r#"[
        {"id": "page:Home", "path": "pages/Home.page", "dependencies": [
            {"target": "c:card", "kind": "component-reference"},
            {"target": "HomeController", "kind": "controller-binding"}
        ]},
        {"id": "c:card", "dependencies": [
            {"target": "c:list", "kind": "component-reference"},
            {"target": "lightning:card", "kind": "component-reference"}
        ]},
        {"id": "c:list", "dependencies": [
            {"target": "c:row", "kind": "component-reference"}
        ]},
        {"id": "c:row", "dependencies": [
            {"target": "c:list", "kind": "event"}
        ]},
        {"id": "c:lonely"}
    ]"#;

    pub fn write_input(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write input");
        file
    }

    pub fn context(output: OutputMode) -> Context {
        Context {
            output,
            project: ProjectConfig::default(),
        }
    }

    pub fn sample_graph() -> DependencyGraph {
        let file = write_input(SAMPLE);
        let source = SourceArgs {
            input: file.path().to_path_buf(),
            include_base: false,
        };
        load_graph(&source, &context(OutputMode::Text)).expect("sample graph builds")
    }
}
