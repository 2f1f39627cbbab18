//! `wavemap cycles`: list circular dependency groups.

use std::io::Write;

use clap::Args;
use serde::Serialize;
use wavemap_graph::graph::CycleReport;

use crate::cmd::{Context, SourceArgs, load_graph};
use crate::output::{pretty_section, render_mode};

/// Arguments for `wavemap cycles`.
#[derive(Args, Debug)]
pub struct CyclesArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Serialize)]
struct CyclesOutput {
    cycles: Vec<CycleReport>,
}

/// Execute `wavemap cycles`.
pub fn run_cycles(args: &CyclesArgs, ctx: &Context) -> anyhow::Result<()> {
    let graph = load_graph(&args.source, ctx)?;
    let payload = CyclesOutput {
        cycles: graph.cycle_reports().to_vec(),
    };

    render_mode(ctx.output, &payload, render_cycles_text, render_cycles_human)
}

fn break_label(report: &CycleReport) -> Option<String> {
    let first = report.suggested_breaks.first()?;
    Some(format!("{} -> {}", first.from, first.to))
}

fn render_cycles_text(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for report in &payload.cycles {
        write!(w, "cycle {}", report.members.join(" "))?;
        for b in &report.suggested_breaks {
            write!(w, " break={}->{}", b.from, b.to)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn render_cycles_human(payload: &CyclesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    if payload.cycles.is_empty() {
        writeln!(w, "No circular dependencies found.")?;
        return Ok(());
    }

    pretty_section(w, &format!("Circular dependencies ({})", payload.cycles.len()))?;

    for (idx, report) in payload.cycles.iter().enumerate() {
        writeln!(w, "\nGroup {}:", idx + 1)?;
        for id in &report.members {
            writeln!(w, "  - {id}")?;
        }
        if let Some(label) = break_label(report) {
            writeln!(w, "  suggested break: {label}")?;
        }
    }

    Ok(())
}
