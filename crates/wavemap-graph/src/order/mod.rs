//! Conversion-wave scheduling.
//!
//! # Algorithm
//!
//! Only convertible kinds (custom components and pages) are scheduled.
//! Dependencies on any other kind are satisfied trivially.
//!
//! 1. Restrict the dependency adjacency to convertible nodes.
//! 2. Each round, a node is eligible once every convertible dependency was
//!    scheduled in an earlier wave. Dependencies on circular-group members
//!    never block: a cycle has no valid order, so its members are converted
//!    alongside whatever needs them.
//! 3. All eligible nodes form the next wave, sorted by kind (components
//!    before pages), then name, then identifier.
//! 4. If a round finds nothing eligible while nodes remain, the remainder is
//!    scheduled as one final coordinated wave and the loop stops.
//!
//! Each round schedules at least one node or exits, so the loop runs at most
//! once per convertible node.
//!
//! # Effort
//!
//! A wave's estimate is the sum of its members' external estimates, with the
//! per-component constant standing in for members without one. Waves that
//! hold circular members use the higher circular constant.

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use wavemap_core::config::OrderConfig;
use wavemap_core::model::NodeKind;

use crate::graph::{CycleReport, DependencyGraph, DependencyNode};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One batch of components that can be converted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionWave {
    /// 1-based, increasing by one per wave.
    pub number: usize,
    pub components: Vec<String>,
    /// Previously scheduled components that members of this wave depend on.
    pub blocked_by: Vec<String>,
    pub estimated_hours: f64,
    /// Members must be converted simultaneously (the wave holds circular
    /// members, or is the unresolved remainder).
    pub coordinated: bool,
}

/// The full conversion plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOrderResult {
    pub waves: Vec<ConversionWave>,
    pub circular_groups: Vec<Vec<String>>,
    pub advisories: Vec<String>,
    pub total_components: usize,
    pub wave_count: usize,
}

impl ConversionOrderResult {
    #[must_use]
    pub fn total_estimated_hours(&self) -> f64 {
        self.waves.iter().map(|w| w.estimated_hours).sum()
    }

    /// Wave number holding `id`, if it was scheduled.
    #[must_use]
    pub fn wave_of(&self, id: &str) -> Option<usize> {
        self.waves
            .iter()
            .find(|w| w.components.iter().any(|c| c == id))
            .map(|w| w.number)
    }
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// Compute the conversion order for a finished graph.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count(), cycles = graph.circular_groups().len()))]
pub fn compute_conversion_order(graph: &DependencyGraph, config: &OrderConfig) -> ConversionOrderResult {
    let nodes = graph.nodes();
    let n = nodes.len();

    let mut convertible = FixedBitSet::with_capacity(n);
    for (idx, node) in nodes.iter().enumerate() {
        if node.kind.is_convertible() {
            convertible.insert(idx);
        }
    }

    // Convertible dependencies of each convertible node, deduplicated.
    let deps: Vec<Vec<usize>> = graph
        .outgoing()
        .iter()
        .enumerate()
        .map(|(idx, targets)| {
            if !convertible.contains(idx) {
                return Vec::new();
            }
            let mut list: Vec<usize> = targets
                .iter()
                .copied()
                .filter(|&t| convertible.contains(t))
                .collect();
            list.sort_unstable();
            list.dedup();
            list
        })
        .collect();

    let is_circular = |idx: usize| nodes[idx].metrics().is_circular;

    let mut scheduled = FixedBitSet::with_capacity(n);
    let mut remaining = convertible.count_ones(..);
    let total_components = remaining;
    let mut waves: Vec<ConversionWave> = Vec::new();
    let mut remainder_fired = false;

    let ready = |idx: usize, scheduled: &FixedBitSet| {
        deps[idx]
            .iter()
            .all(|&d| scheduled.contains(d) || is_circular(d))
    };

    while remaining > 0 {
        let mut eligible: Vec<usize> = convertible
            .ones()
            .filter(|&idx| !scheduled.contains(idx) && ready(idx, &scheduled))
            .collect();

        let coordinated_remainder = eligible.is_empty();
        if coordinated_remainder {
            warn!(remaining, "no eligible components; scheduling remainder as one wave");
            eligible = convertible.ones().filter(|&i| !scheduled.contains(i)).collect();
            remainder_fired = true;
        }

        let wave = make_wave(
            waves.len() + 1,
            &eligible,
            nodes,
            &deps,
            &scheduled,
            coordinated_remainder,
            config,
        );
        for &idx in &eligible {
            scheduled.insert(idx);
        }
        remaining -= eligible.len();
        debug!(wave = wave.number, size = wave.components.len(), "wave scheduled");
        waves.push(wave);

        if coordinated_remainder {
            break;
        }
    }

    let advisories = build_advisories(graph, &waves, remainder_fired);
    let wave_count = waves.len();

    ConversionOrderResult {
        waves,
        circular_groups: graph.circular_groups().to_vec(),
        advisories,
        total_components,
        wave_count,
    }
}

fn make_wave(
    number: usize,
    members: &[usize],
    nodes: &[DependencyNode],
    deps: &[Vec<usize>],
    scheduled: &FixedBitSet,
    remainder: bool,
    config: &OrderConfig,
) -> ConversionWave {
    let mut ordered: Vec<&DependencyNode> = members.iter().map(|&i| &nodes[i]).collect();
    ordered.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut blocked_by: Vec<String> = members
        .iter()
        .flat_map(|&i| deps[i].iter().copied())
        .filter(|&d| scheduled.contains(d))
        .map(|d| nodes[d].id.clone())
        .collect();
    blocked_by.sort_unstable();
    blocked_by.dedup();

    let has_circular = ordered.iter().any(|n| n.metrics().is_circular);
    let fallback_hours = if has_circular {
        config.hours_per_circular_component
    } else {
        config.hours_per_component
    };
    let estimated_hours = ordered
        .iter()
        .map(|n| n.estimated_hours.unwrap_or(fallback_hours))
        .sum();

    ConversionWave {
        number,
        components: ordered.into_iter().map(|n| n.id.clone()).collect(),
        blocked_by,
        estimated_hours,
        coordinated: has_circular || remainder,
    }
}

// ---------------------------------------------------------------------------
// Advisories
// ---------------------------------------------------------------------------

fn build_advisories(graph: &DependencyGraph, waves: &[ConversionWave], remainder: bool) -> Vec<String> {
    let mut advisories = Vec::new();

    if let Some(first) = waves.first() {
        advisories.push(format!(
            "Wave 1 has no unconverted dependencies ({} component{}); start there.",
            first.components.len(),
            plural(first.components.len())
        ));
    }

    for report in graph.cycle_reports() {
        advisories.push(describe_cycle(report));
    }

    let controllers = graph
        .nodes()
        .iter()
        .filter(|n| n.kind == NodeKind::Controller)
        .count();
    if controllers > 0 {
        advisories.push(format!(
            "{controllers} server-side controller{} referenced; stabilize their contracts before or alongside conversion.",
            plural(controllers)
        ));
    }

    if let Some(last) = waves.last().filter(|_| remainder) {
        advisories.push(format!(
            "Wave {} could not be ordered and holds {} component{} blocked by unresolved circular dependencies; convert them together.",
            last.number,
            last.components.len(),
            plural(last.components.len())
        ));
    }

    advisories
}

fn describe_cycle(report: &CycleReport) -> String {
    let members = report.members.join(", ");
    let text = if report.members.len() == 1 {
        format!("Circular dependency: {members} depends on itself.")
    } else {
        format!("Circular dependency: {members} reference each other; convert them in coordination.")
    };
    match report.suggested_breaks.first() {
        Some(edge) => format!("{text} Suggested break: {} -> {}.", edge.from, edge.to),
        None => text,
    }
}

const fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
