//! `wavemap stats`: summary statistics and build diagnostics.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use wavemap_graph::GraphStats;
use wavemap_graph::graph::BuildDiagnostics;

use crate::cmd::{Context, SourceArgs, load_graph};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `wavemap stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Serialize)]
struct StatsOutput {
    stats: GraphStats,
    content_hash: String,
    diagnostics: BuildDiagnostics,
}

/// Execute `wavemap stats`.
pub fn run_stats(args: &StatsArgs, ctx: &Context) -> anyhow::Result<()> {
    let graph = load_graph(&args.source, ctx)?;
    let payload = StatsOutput {
        stats: graph.stats().clone(),
        content_hash: graph.content_hash().to_string(),
        diagnostics: graph.diagnostics().clone(),
    };
    render_mode(ctx.output, &payload, render_stats_text, render_stats_pretty)
}

fn render_stats_text(payload: &StatsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &payload.stats;
    writeln!(w, "nodes {}", s.node_count)?;
    writeln!(w, "edges {}", s.edge_count)?;
    for (kind, count) in &s.nodes_by_kind {
        writeln!(w, "nodes.{kind} {count}")?;
    }
    for (kind, count) in &s.edges_by_kind {
        writeln!(w, "edges.{kind} {count}")?;
    }
    writeln!(w, "max_depth {}", s.max_depth)?;
    writeln!(w, "average_connectivity {:.2}", s.average_connectivity)?;
    writeln!(w, "density {:.4}", s.density)?;
    writeln!(w, "cycles {}", s.cycle_count)?;
    writeln!(w, "roots {}", s.root_count)?;
    writeln!(w, "leaves {}", s.leaf_count)?;
    writeln!(w, "orphans {}", s.orphan_count)?;
    writeln!(w, "max_in_degree {}", s.max_in_degree)?;
    writeln!(w, "max_out_degree {}", s.max_out_degree)?;
    writeln!(w, "components {}", s.weakly_connected_component_count)?;
    writeln!(w, "hash {}", payload.content_hash)?;

    let d = &payload.diagnostics;
    for skipped in &d.skipped {
        writeln!(
            w,
            "skipped {} -> '{}' {} {}",
            skipped.component,
            skipped.target,
            skipped.kind,
            skipped.reason.as_str()
        )?;
    }
    for id in &d.duplicate_components {
        writeln!(w, "duplicate {id}")?;
    }
    if d.unnamed_components > 0 {
        writeln!(w, "unnamed {}", d.unnamed_components)?;
    }
    if d.depth_truncated {
        writeln!(w, "depth_truncated true")?;
    }
    Ok(())
}

fn render_stats_pretty(payload: &StatsOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &payload.stats;
    pretty_section(w, "Graph statistics")?;
    pretty_kv(w, "Components", s.node_count.to_string())?;
    pretty_kv(w, "Dependencies", s.edge_count.to_string())?;
    pretty_kv(w, "Max depth", s.max_depth.to_string())?;
    pretty_kv(w, "Connectivity", format!("{:.2}", s.average_connectivity))?;
    pretty_kv(w, "Density", format!("{:.4}", s.density))?;
    pretty_kv(w, "Cycles", s.cycle_count.to_string())?;
    pretty_kv(
        w,
        "Roots/leaves",
        format!("{} / {}", s.root_count, s.leaf_count),
    )?;
    pretty_kv(w, "Orphans", s.orphan_count.to_string())?;
    pretty_kv(w, "Subgraphs", s.weakly_connected_component_count.to_string())?;
    pretty_kv(w, "Hash", &payload.content_hash)?;

    if !s.nodes_by_kind.is_empty() {
        writeln!(w)?;
        pretty_section(w, "By kind")?;
        for (kind, count) in &s.nodes_by_kind {
            writeln!(w, "  {:<18} {count:>5}", kind.as_str())?;
        }
    }

    if !s.edges_by_kind.is_empty() {
        writeln!(w)?;
        pretty_section(w, "By dependency")?;
        for (kind, count) in &s.edges_by_kind {
            writeln!(w, "  {:<26} {count:>5}", kind.as_str())?;
        }
    }

    let d = &payload.diagnostics;
    if !d.is_clean() {
        writeln!(w)?;
        pretty_section(w, "Input problems")?;
        for skipped in &d.skipped {
            writeln!(
                w,
                "  {}: skipped '{}' ({}, {})",
                skipped.component,
                skipped.target,
                skipped.kind,
                skipped.reason.as_str()
            )?;
        }
        for id in &d.duplicate_components {
            writeln!(w, "  {id}: analyzed more than once")?;
        }
        if d.unnamed_components > 0 {
            writeln!(w, "  {} analyses without an id ignored", d.unnamed_components)?;
        }
        if d.depth_truncated {
            writeln!(w, "  depth limit reached; some depths are capped")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::test_support::{context, sample_graph, write_input};
    use crate::cmd::{SourceArgs, load_graph};
    use crate::output::OutputMode;

    fn payload_for(graph: &wavemap_graph::DependencyGraph) -> StatsOutput {
        StatsOutput {
            stats: graph.stats().clone(),
            content_hash: graph.content_hash().to_string(),
            diagnostics: graph.diagnostics().clone(),
        }
    }

    fn render(f: fn(&StatsOutput, &mut dyn Write) -> std::io::Result<()>, p: &StatsOutput) -> String {
        let mut out = Vec::new();
        f(p, &mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn text_has_one_metric_per_line() {
        let text = render(render_stats_text, &payload_for(&sample_graph()));
        assert!(text.contains("nodes 6\n"));
        assert!(text.contains("edges 5\n"));
        assert!(text.contains("nodes.controller 1\n"));
        assert!(text.contains("edges.event 1\n"));
        assert!(text.contains("cycles 1\n"));
        assert!(text.contains("orphans 1\n"));
        assert!(text.contains("hash blake3:"));
        assert!(!text.contains("skipped"));
    }

    #[test]
    fn diagnostics_are_reported() {
        let file = write_input(
            r#"[
                {"id": "c:a", "dependencies": [
                    {"target": "  ", "kind": "event"},
                    {"target": "c:b", "kind": "teleport"}
                ]},
                {"id": "c:a"},
                {"id": ""}
            ]"#,
        );
        let source = SourceArgs {
            input: file.path().to_path_buf(),
            include_base: false,
        };
        let graph = load_graph(&source, &context(OutputMode::Text)).expect("graph");
        let payload = payload_for(&graph);

        let text = render(render_stats_text, &payload);
        assert!(text.contains("duplicate c:a\n"));
        assert!(text.contains("unnamed 1\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("skipped ")).count(), 2);

        let pretty = render(render_stats_pretty, &payload);
        assert!(pretty.contains("Input problems"));
        assert!(pretty.contains("analyzed more than once"));
    }

    #[test]
    fn pretty_summarizes_counts() {
        let pretty = render(render_stats_pretty, &payload_for(&sample_graph()));
        assert!(pretty.contains("Graph statistics"));
        assert!(pretty.contains("By kind"));
        assert!(!pretty.contains("Input problems"));
    }
}
