#![no_main]

use libfuzzer_sys::fuzz_target;
use wavemap_core::config::OrderConfig;
use wavemap_core::model::parse_analyses;
use wavemap_graph::graph::query::{circular_only, focus, without_orphans};
use wavemap_graph::{BuildOptions, GraphBuilder, compute_conversion_order};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(analyses) = parse_analyses(text) else {
        return;
    };

    for include_base_components in [false, true] {
        let graph = GraphBuilder::new(BuildOptions {
            include_base_components,
            ..BuildOptions::default()
        })
        .build(&analyses);

        let order = compute_conversion_order(&graph, &OrderConfig::default());
        let scheduled: usize = order.waves.iter().map(|w| w.components.len()).sum();
        assert_eq!(scheduled, order.total_components);

        let trimmed = without_orphans(&graph);
        assert_eq!(trimmed.stats().orphan_count, 0);
        let circ = circular_only(&trimmed);
        assert_eq!(circ.circular_groups(), graph.circular_groups());

        if let Some(first) = graph.nodes().first() {
            let sub = focus(&graph, &first.id, 2).expect("existing id resolves");
            assert!(sub.contains(&first.id));
        }
        let _ = serde_json::to_string(&wavemap_graph::GraphView::from(&graph));
    }
});
