#![forbid(unsafe_code)]

//! Headless organic grid layout for node-link diagrams.
//!
//! Given only node ids and edges, `okapi` relaxes the linked part of the graph with a damped
//! spring simulation, snaps the result onto a uniform grid without collisions, and packs
//! unconnected nodes around it. A pure grid fill and a hierarchical mode (delegated to an external
//! backend) are available through the same entry point.
//!
//! # Features
//!
//! - `dagre`: hierarchical mode backed by `dagre_rust` (installed by [`Engine::new`])

pub mod algo;
pub mod error;
pub mod graph;
pub mod rng;
pub mod topology;

pub use algo::hierarchical::HierarchicalLayout;
pub use algo::organic::placement::GridCell;
pub use algo::{
    Algorithm, CellSize, GridOptions, HierarchicalOptions, OrganicOptions, RankDir, SpringOptions,
};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, Handles, LayoutResult, Node, Point, PositionedNode, Side};
pub use rng::{ConstantJitter, JitterSource, XorShift64Star};
pub use topology::{Topology, TopologySummary};

use std::sync::Arc;

/// Headless layout entry point using the default [`Engine`].
pub fn layout(graph: &Graph, algorithm: &Algorithm) -> Result<LayoutResult> {
    Engine::new().layout(graph, algorithm)
}

/// Layout dispatcher. Holds the hierarchical backend, if any; everything else is per call.
#[derive(Clone, Default)]
pub struct Engine {
    hierarchical: Option<Arc<dyn HierarchicalLayout + Send + Sync>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("hierarchical", &self.hierarchical.is_some())
            .finish()
    }
}

impl Engine {
    pub fn new() -> Self {
        #[cfg(feature = "dagre")]
        {
            Self::default().with_hierarchical(Arc::new(algo::hierarchical::DagreLayout))
        }
        #[cfg(not(feature = "dagre"))]
        {
            Self::default()
        }
    }

    pub fn with_hierarchical(mut self, backend: Arc<dyn HierarchicalLayout + Send + Sync>) -> Self {
        self.hierarchical = Some(backend);
        self
    }

    pub fn has_hierarchical(&self) -> bool {
        self.hierarchical.is_some()
    }

    pub fn layout(&self, graph: &Graph, algorithm: &Algorithm) -> Result<LayoutResult> {
        if graph.nodes.is_empty() {
            return Ok(LayoutResult::default());
        }
        match algorithm {
            Algorithm::Organic(opts) => algo::organic::layout(graph, opts),
            Algorithm::Grid(opts) => algo::grid::layout(graph, opts),
            Algorithm::Hierarchical(opts) => {
                let Some(backend) = self.hierarchical.as_deref() else {
                    return Err(Error::HierarchicalUnavailable);
                };
                algo::hierarchical::layout(graph, opts, backend)
            }
        }
    }
}
