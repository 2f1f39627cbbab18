#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode};
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wavemap_core::ErrorCode;
use wavemap_core::config::resolve_config;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "wavemap: dependency graph and conversion waves for legacy UI components",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a terminal, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Output mode used before config has been resolved.
    fn fallback_output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, if self.json { "json" } else { "text" })
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Graph",
        about = "Show the dependency graph",
        long_about = "Build the dependency graph from extractor output and show every node and edge.",
        after_help = "EXAMPLES:\n    # Whole graph\n    wavemap graph --input analysis.json\n\n    # Only components in circular groups\n    wavemap graph --input analysis.json --circular-only\n\n    # Drop isolated components, emit JSON\n    wavemap graph --input analysis.json --no-orphans --json"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Show the neighborhood of one component",
        long_about = "Show everything a component depends on and everything that depends on it, up to a depth.",
        after_help = "EXAMPLES:\n    # Full neighborhood\n    wavemap focus c:accountCard --input analysis.json\n\n    # Direct neighbors only, by bare name\n    wavemap focus accountCard --depth 1 --input analysis.json"
    )]
    Focus(cmd::focus::FocusArgs),

    #[command(
        next_help_heading = "Graph",
        about = "List circular dependency groups",
        long_about = "List every group of components that depend on each other, with an edge to remove to break each.",
        after_help = "EXAMPLES:\n    # Show cycles\n    wavemap cycles --input analysis.json\n\n    # Emit machine-readable output\n    wavemap cycles --input analysis.json --json"
    )]
    Cycles(cmd::cycles::CyclesArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Compute conversion waves",
        long_about = "Group components into waves where each wave only depends on earlier waves.",
        after_help = "EXAMPLES:\n    # Show the conversion plan\n    wavemap order --input analysis.json\n\n    # Count base-component references as dependencies\n    wavemap order --input analysis.json --include-base"
    )]
    Order(cmd::order::OrderArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Show graph statistics",
        long_about = "Show summary statistics, build diagnostics, and the graph content hash.",
        after_help = "EXAMPLES:\n    # Summary\n    wavemap stats --input analysis.json\n\n    # Emit machine-readable output\n    wavemap stats --input analysis.json --json"
    )]
    Stats(cmd::stats::StatsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("WAVEMAP_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "wavemap=debug,info"
        } else {
            "wavemap=info,warn"
        })
    });

    let format = env::var("WAVEMAP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries command output, so logs always go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let config = match resolve_config(&project_root, cli.json) {
        Ok(config) => config,
        Err(e) => {
            output::render_error(
                cli.fallback_output_mode(),
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{e:#}")),
            )?;
            return Err(e);
        }
    };

    let ctx = cmd::Context {
        output: output::resolve_output_mode(cli.format, &config.resolved_output),
        project: config.project,
    };

    match cli.command {
        Commands::Graph(ref args) => cmd::graph::run_graph(args, &ctx),
        Commands::Focus(ref args) => cmd::focus::run_focus(args, &ctx),
        Commands::Cycles(ref args) => cmd::cycles::run_cycles(args, &ctx),
        Commands::Order(ref args) => cmd::order::run_order(args, &ctx),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, &ctx),
    }
}
