use super::HierarchicalLayout;
use crate::algo::{HierarchicalOptions, RankDir};
use crate::error::{Error, Result};
use crate::graph::{Graph, Point};
use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use std::collections::BTreeMap;

/// dagre only understands lowercase rank directions.
fn dagre_rankdir(dir: RankDir) -> &'static str {
    match dir {
        RankDir::LeftRight => "lr",
        RankDir::TopBottom => "tb",
    }
}

/// [`HierarchicalLayout`] backed by `dagre_rust`. Every node gets the same fixed box from the
/// options; returned positions are box top-left corners.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreLayout;

impl HierarchicalLayout for DagreLayout {
    fn layout(&self, graph: &Graph, opts: &HierarchicalOptions) -> Result<BTreeMap<String, Point>> {
        let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
            DagreGraph::new(Some(GraphOption {
                directed: Some(true),
                multigraph: Some(false),
                compound: Some(false),
            }));

        let mut graph_config = DagreConfig::default();
        graph_config.rankdir = Some(dagre_rankdir(opts.rank_dir).to_string());
        graph_config.nodesep = Some(opts.node_sep as f32);
        graph_config.ranksep = Some(opts.rank_sep as f32);
        dagre_graph.set_graph(graph_config);

        let width = opts.node_width as f32;
        let height = opts.node_height as f32;
        for n in &graph.nodes {
            let mut node = DagreNode::default();
            node.width = width;
            node.height = height;
            dagre_graph.set_node(n.id.clone(), Some(node));
        }
        for e in &graph.edges {
            if e.source == e.target {
                continue;
            }
            dagre_graph
                .set_edge(&e.source, &e.target, Some(DagreEdge::default()), None)
                .map_err(|err| Error::Hierarchical {
                    message: format!("dagre rejected edge {} -> {}: {err}", e.source, e.target),
                })?;
        }

        dagre_layout::run_layout(&mut dagre_graph);

        let mut out = BTreeMap::new();
        for n in &graph.nodes {
            let Some(placed) = dagre_graph.node(&n.id) else {
                return Err(Error::Hierarchical {
                    message: format!("dagre dropped node {}", n.id),
                });
            };
            out.insert(
                n.id.clone(),
                Point::new(
                    f64::from(placed.x - width / 2.0),
                    f64::from(placed.y - height / 2.0),
                ),
            );
        }
        Ok(out)
    }
}
