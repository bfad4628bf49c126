use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input graph: node identities plus directed edges, no positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for id-only graphs.
    pub fn from_ids<'a>(
        nodes: impl IntoIterator<Item = &'a str>,
        edges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().map(Node::new).collect(),
            edges: edges
                .into_iter()
                .map(|(source, target)| Edge::new(source, target))
                .collect(),
        }
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(Edge::new(source, target));
        self
    }

    /// Nodes with distinct ids, first occurrence wins, input order preserved.
    pub(crate) fn unique_nodes(&self) -> IndexMap<&str, &Node> {
        let mut out: IndexMap<&str, &Node> = IndexMap::with_capacity(self.nodes.len());
        for n in &self.nodes {
            if out.contains_key(n.id.as_str()) {
                tracing::debug!(node_id = %n.id, "dropping duplicate node id");
                continue;
            }
            out.insert(n.id.as_str(), n);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Host payload, passed through to the layout output untouched.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: Value::Null,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Which side of a node accepts inbound edges (`target`) and which emits outbound ones
/// (`source`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handles {
    pub target: Side,
    pub source: Side,
}

impl Handles {
    /// Grid and organic layouts flow top to bottom.
    pub const VERTICAL: Handles = Handles {
        target: Side::Top,
        source: Side::Bottom,
    };
    /// Hierarchical layouts flow left to right.
    pub const HORIZONTAL: Handles = Handles {
        target: Side::Left,
        source: Side::Right,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    pub position: Point,
    pub handles: Handles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// One entry per distinct input node id, in input order.
    pub nodes: Vec<PositionedNode>,
    /// Ids whose ring search ran out of radius and now share a cell with another node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overlapping: Vec<String>,
}

impl LayoutResult {
    pub(crate) fn assemble(
        nodes: &IndexMap<&str, &Node>,
        positions: &[Point],
        handles: Handles,
    ) -> Self {
        let nodes = nodes
            .values()
            .zip(positions)
            .map(|(n, p)| PositionedNode {
                id: n.id.clone(),
                data: n.data.clone(),
                position: *p,
                handles,
            })
            .collect();
        Self {
            nodes,
            overlapping: Vec::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn positions(&self) -> std::collections::BTreeMap<String, Point> {
        self.nodes
            .iter()
            .map(|n| (n.id.clone(), n.position))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
