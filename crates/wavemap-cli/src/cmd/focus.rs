//! `wavemap focus`: the neighborhood of one component.

use clap::Args;
use tracing::debug;
use wavemap_core::ErrorCode;
use wavemap_graph::GraphView;
use wavemap_graph::graph::query::{focus, resolve_node};

use crate::cmd::graph::{render_graph_pretty, render_graph_text};
use crate::cmd::{Context, SourceArgs, load_graph};
use crate::output::{CliError, render_error, render_mode};

/// Arguments for `wavemap focus`.
#[derive(Args, Debug)]
pub struct FocusArgs {
    /// Component id (`c:name`, `page:Name`) or a unique suffix of one.
    pub target: String,

    /// Hops to follow in each direction; 0 follows everything reachable.
    #[arg(long, default_value_t = 0)]
    pub depth: usize,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Execute `wavemap focus`.
pub fn run_focus(args: &FocusArgs, ctx: &Context) -> anyhow::Result<()> {
    let graph = load_graph(&args.source, ctx)?;

    let sub = match focus(&graph, &args.target, args.depth) {
        Ok(sub) => sub,
        Err(e) => {
            render_error(ctx.output, &CliError::from_code(ErrorCode::FocusNotFound, e.to_string()))?;
            return Err(anyhow::Error::new(e));
        }
    };

    if let Some(resolved) = resolve_node(&graph, &args.target) {
        debug!(query = %args.target, resolved, nodes = sub.node_count(), "focused");
    }

    let view = GraphView::from(&sub);
    render_mode(ctx.output, &view, render_graph_text, render_graph_pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::test_support::sample_graph;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: FocusArgs,
    }

    #[test]
    fn focus_args_require_target() {
        assert!(Wrapper::try_parse_from(["test", "--input", "a.json"]).is_err());
        let parsed = Wrapper::parse_from(["test", "row", "--input", "a.json", "--depth", "1"]);
        assert_eq!(parsed.args.target, "row");
        assert_eq!(parsed.args.depth, 1);
    }

    #[test]
    fn focused_view_renders_neighborhood() {
        let graph = sample_graph();
        let sub = focus(&graph, "card", 1).expect("card resolves");
        let view = GraphView::from(&sub);

        let mut out = Vec::new();
        render_graph_text(&view, &mut out).expect("render");
        let text = String::from_utf8(out).expect("utf8");

        assert!(text.contains("node c:card "));
        assert!(text.contains("node page:Home "));
        assert!(text.contains("node c:list "));
        assert!(!text.contains("c:row"));
        assert!(!text.contains("c:lonely"));
    }

    #[test]
    fn unknown_target_maps_to_focus_error() {
        let graph = sample_graph();
        let err = focus(&graph, "nothing-like-it", 0).unwrap_err();
        let cli = CliError::from_code(ErrorCode::FocusNotFound, err.to_string());
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
        assert!(cli.message.contains("nothing-like-it"));
    }
}
