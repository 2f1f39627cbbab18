//! `wavemap order`: conversion waves.

use std::io::Write;

use clap::Args;
use wavemap_graph::{ConversionOrderResult, compute_conversion_order};

use crate::cmd::{Context, SourceArgs, load_graph};
use crate::output::{pretty_kv, pretty_section, render_mode};

/// Arguments for `wavemap order`.
#[derive(Args, Debug)]
pub struct OrderArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute `wavemap order`.
pub fn run_order(args: &OrderArgs, ctx: &Context) -> anyhow::Result<()> {
    let graph = load_graph(&args.source, ctx)?;
    let result = compute_conversion_order(&graph, &ctx.project.order);
    render_mode(ctx.output, &result, render_order_text, render_order_pretty)
}

fn render_order_text(result: &ConversionOrderResult, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "waves={} components={} hours={:.1}",
        result.wave_count,
        result.total_components,
        result.total_estimated_hours()
    )?;
    for wave in &result.waves {
        write!(
            w,
            "wave {} hours={:.1}{} {}",
            wave.number,
            wave.estimated_hours,
            if wave.coordinated { " coordinated" } else { "" },
            wave.components.join(" ")
        )?;
        if !wave.blocked_by.is_empty() {
            write!(w, " after={}", wave.blocked_by.join(","))?;
        }
        writeln!(w)?;
    }
    for advisory in &result.advisories {
        writeln!(w, "note {advisory}")?;
    }
    Ok(())
}

fn render_order_pretty(result: &ConversionOrderResult, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Conversion plan")?;
    pretty_kv(w, "Waves", result.wave_count.to_string())?;
    pretty_kv(w, "Components", result.total_components.to_string())?;
    pretty_kv(w, "Estimate", format!("{:.1}h", result.total_estimated_hours()))?;

    if result.waves.is_empty() {
        writeln!(w, "\nNothing to convert.")?;
    }

    for wave in &result.waves {
        writeln!(w)?;
        let heading = if wave.coordinated {
            format!("Wave {} ({:.1}h, convert together)", wave.number, wave.estimated_hours)
        } else {
            format!("Wave {} ({:.1}h)", wave.number, wave.estimated_hours)
        };
        pretty_section(w, &heading)?;
        for id in &wave.components {
            writeln!(w, "  - {id}")?;
        }
        if !wave.blocked_by.is_empty() {
            writeln!(w, "  after: {}", wave.blocked_by.join(", "))?;
        }
    }

    if !result.advisories.is_empty() {
        writeln!(w)?;
        pretty_section(w, "Advisories")?;
        for advisory in &result.advisories {
            writeln!(w, "* {advisory}")?;
        }
    }

    Ok(())
}
