//! `wavemap graph`: show every node and edge of the dependency graph.

use std::io::Write;

use clap::Args;
use wavemap_graph::GraphView;
use wavemap_graph::graph::query::{circular_only, without_orphans};

use crate::cmd::{Context, SourceArgs, load_graph};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `wavemap graph`.
#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Keep only components that belong to a circular group.
    #[arg(long)]
    pub circular_only: bool,

    /// Drop components with no dependencies in either direction.
    #[arg(long)]
    pub no_orphans: bool,
}

/// Execute `wavemap graph`.
pub fn run_graph(args: &GraphArgs, ctx: &Context) -> anyhow::Result<()> {
    let mut graph = load_graph(&args.source, ctx)?;
    if args.no_orphans {
        graph = without_orphans(&graph);
    }
    if args.circular_only {
        graph = circular_only(&graph);
    }

    let view = GraphView::from(&graph);
    render_mode(ctx.output, &view, render_graph_text, render_graph_pretty)
}

/// Flags shown after a node in human output.
fn node_flags(node: &wavemap_graph::NodeView) -> String {
    let mut flags = Vec::new();
    if node.in_degree == 0 && node.out_degree > 0 {
        flags.push("root");
    }
    if node.is_leaf {
        flags.push("leaf");
    }
    if node.is_orphan {
        flags.push("orphan");
    }
    if node.is_circular {
        flags.push("circular");
    }
    flags.join(",")
}

pub(crate) fn render_graph_text(view: &GraphView, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "nodes={} edges={} cycles={} orphans={} hash={}",
        view.stats.node_count,
        view.stats.edge_count,
        view.stats.cycle_count,
        view.stats.orphan_count,
        view.content_hash
    )?;
    for node in &view.nodes {
        let flags = node_flags(node);
        write!(
            w,
            "node {} kind={} in={} out={} depth={}",
            node.id, node.kind, node.in_degree, node.out_degree, node.depth
        )?;
        if flags.is_empty() {
            writeln!(w)?;
        } else {
            writeln!(w, " {flags}")?;
        }
    }
    for edge in &view.edges {
        writeln!(w, "edge {} -> {} {}", edge.from, edge.to, edge.kind)?;
    }
    for group in &view.circular_groups {
        writeln!(w, "cycle {}", group.join(" "))?;
    }
    Ok(())
}

pub(crate) fn render_graph_pretty(view: &GraphView, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Dependency graph")?;
    pretty_kv(w, "Components", view.stats.node_count.to_string())?;
    pretty_kv(w, "Dependencies", view.stats.edge_count.to_string())?;
    pretty_kv(w, "Cycles", view.stats.cycle_count.to_string())?;
    pretty_kv(w, "Hash", &view.content_hash)?;

    if view.nodes.is_empty() {
        writeln!(w, "\nNo components.")?;
        return Ok(());
    }

    writeln!(w)?;
    pretty_section(w, "Components")?;
    writeln!(
        w,
        "{:<40} {:<16} {:>4} {:>4} {:>5}  flags",
        "id", "kind", "in", "out", "depth"
    )?;
    for node in &view.nodes {
        writeln!(
            w,
            "{:<40} {:<16} {:>4} {:>4} {:>5}  {}",
            node.id,
            node.kind.as_str(),
            node.in_degree,
            node.out_degree,
            node.depth,
            node_flags(node)
        )?;
    }

    if !view.edges.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Dependencies")?;
        for edge in &view.edges {
            writeln!(w, "{} -> {}  ({})", edge.from, edge.to, edge.kind)?;
        }
    }

    if !view.circular_groups.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Circular groups")?;
        for (idx, group) in view.circular_groups.iter().enumerate() {
            writeln!(w, "{}. {}", idx + 1, group.join(", "))?;
        }
    }

    Ok(())
}
