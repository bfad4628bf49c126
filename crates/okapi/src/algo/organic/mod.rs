//! Organic mode: topology analysis, spring relaxation, then grid placement.

pub mod placement;
pub mod spring;

use crate::algo::OrganicOptions;
use crate::error::Result;
use crate::graph::{Graph, Handles, LayoutResult, Point};
use crate::rng::{JitterSource, XorShift64Star};
use crate::topology::Topology;

pub fn layout(graph: &Graph, opts: &OrganicOptions) -> Result<LayoutResult> {
    let mut rng = XorShift64Star::new(opts.random_seed);
    layout_with_jitter(graph, opts, &mut rng)
}

/// Same as [`layout`] but draws the initial ring jitter from `jitter` instead of the seeded
/// generator.
pub fn layout_with_jitter(
    graph: &Graph,
    opts: &OrganicOptions,
    jitter: &mut dyn JitterSource,
) -> Result<LayoutResult> {
    opts.validate()?;
    let nodes = graph.unique_nodes();
    if nodes.is_empty() {
        return Ok(LayoutResult::default());
    }

    let topology = Topology::analyze(graph);
    let (simulated, stats) = spring::simulate(&topology, &opts.spring, jitter);
    let placement = placement::resolve(
        &simulated,
        topology.unlinked(),
        opts.cell,
        opts.max_search_radius,
    );
    tracing::debug!(
        nodes = topology.node_count(),
        edges = topology.edges().len(),
        linked = topology.linked().len(),
        components = topology.components().len(),
        iterations = stats.iterations,
        settled = stats.settled,
        "organic layout"
    );

    let mut positions = vec![Point::ORIGIN; topology.node_count()];
    for &(node, cell) in &placement.cells {
        positions[node] = cell.to_point(opts.cell);
    }

    let mut result = LayoutResult::assemble(&nodes, &positions, Handles::VERTICAL);
    result.overlapping = placement
        .exhausted
        .iter()
        .filter_map(|&node| topology.id(node))
        .map(str::to_string)
        .collect();
    Ok(result)
}
