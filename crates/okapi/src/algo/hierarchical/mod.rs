//! Hierarchical mode. The layering itself lives in an external library; this module only adapts
//! graphs in and positions out.

#[cfg(feature = "dagre")]
mod dagre;

#[cfg(feature = "dagre")]
pub use dagre::DagreLayout;

use crate::algo::HierarchicalOptions;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, Handles, LayoutResult, Point};
use crate::topology::Topology;
use std::collections::BTreeMap;

/// A layered layout backend.
pub trait HierarchicalLayout {
    /// Returns the display position of every node in `graph`, keyed by node id.
    ///
    /// `graph` has distinct node ids and only edges between known nodes.
    fn layout(&self, graph: &Graph, opts: &HierarchicalOptions) -> Result<BTreeMap<String, Point>>;
}

pub fn layout(
    graph: &Graph,
    opts: &HierarchicalOptions,
    backend: &dyn HierarchicalLayout,
) -> Result<LayoutResult> {
    opts.validate()?;
    let nodes = graph.unique_nodes();
    if nodes.is_empty() {
        return Ok(LayoutResult::default());
    }

    let topology = Topology::analyze(graph);
    let clean = Graph {
        nodes: nodes.values().map(|&n| n.clone()).collect(),
        edges: topology
            .edges()
            .iter()
            .filter_map(|&(a, b)| Some(Edge::new(topology.id(a)?, topology.id(b)?)))
            .collect(),
    };

    let placed = backend.layout(&clean, opts)?;
    let positions = nodes
        .keys()
        .map(|&id| {
            placed.get(id).copied().ok_or_else(|| Error::MissingPosition {
                node_id: id.to_string(),
            })
        })
        .collect::<Result<Vec<Point>>>()?;
    Ok(LayoutResult::assemble(&nodes, &positions, Handles::HORIZONTAL))
}
