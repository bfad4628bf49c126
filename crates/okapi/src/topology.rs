//! Connectivity analysis: linked/unlinked classification and connected components.

use crate::graph::Graph;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::VecDeque;

/// Undirected connectivity view of one graph, built once per layout call.
///
/// Nodes are addressed by their index in input order (duplicate ids collapse onto the first
/// occurrence). Edges whose endpoints are not both known are dropped here and never reach the
/// simulation.
#[derive(Debug, Clone)]
pub struct Topology<'a> {
    ids: IndexSet<&'a str>,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
    linked: Vec<usize>,
    unlinked: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl<'a> Topology<'a> {
    pub fn analyze(graph: &'a Graph) -> Self {
        Self::build(
            graph.nodes.iter().map(|n| n.id.as_str()),
            graph
                .edges
                .iter()
                .map(|e| (e.source.as_str(), e.target.as_str())),
        )
    }

    pub fn build(
        nodes: impl IntoIterator<Item = &'a str>,
        edges: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let ids: IndexSet<&'a str> = nodes.into_iter().collect();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        let mut valid_edges: Vec<(usize, usize)> = Vec::new();
        let mut dropped = 0usize;
        for (source, target) in edges {
            let (Some(a), Some(b)) = (ids.get_index_of(source), ids.get_index_of(target)) else {
                dropped += 1;
                continue;
            };
            adjacency[a].push(b);
            adjacency[b].push(a);
            valid_edges.push((a, b));
        }
        if dropped > 0 {
            tracing::debug!(dropped, "ignoring edges with unknown endpoints");
        }

        let (linked, unlinked): (Vec<usize>, Vec<usize>) =
            (0..ids.len()).partition(|&idx| !adjacency[idx].is_empty());

        let mut visited = vec![false; ids.len()];
        let mut components: Vec<Vec<usize>> = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        for &start in &linked {
            if visited[start] {
                continue;
            }
            visited[start] = true;
            queue.push_back(start);
            let mut component = Vec::new();
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for &w in &adjacency[v] {
                    if !visited[w] {
                        visited[w] = true;
                        queue.push_back(w);
                    }
                }
            }
            components.push(component);
        }

        Self {
            ids,
            adjacency,
            edges: valid_edges,
            linked,
            unlinked,
            components,
        }
    }

    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    pub fn id(&self, idx: usize) -> Option<&'a str> {
        self.ids.get_index(idx).copied()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.get_index_of(id)
    }

    /// Valid edges as `(source, target)` node indices, in input order.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn linked(&self) -> &[usize] {
        &self.linked
    }

    pub fn unlinked(&self) -> &[usize] {
        &self.unlinked
    }

    /// Components in traversal-start order; members in BFS visit order.
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    pub fn neighbors(&self, id: &str) -> Option<Vec<&'a str>> {
        let idx = self.index_of(id)?;
        Some(self.adjacency[idx].iter().filter_map(|&n| self.id(n)).collect())
    }

    pub fn summary(&self) -> TopologySummary {
        let names = |indices: &[usize]| -> Vec<String> {
            indices
                .iter()
                .filter_map(|&i| self.id(i))
                .map(str::to_string)
                .collect()
        };
        TopologySummary {
            linked: names(self.linked.as_slice()),
            unlinked: names(self.unlinked.as_slice()),
            components: self.components.iter().map(|c| names(c.as_slice())).collect(),
        }
    }
}

/// Id-level view of a [`Topology`], suitable for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologySummary {
    pub linked: Vec<String>,
    pub unlinked: Vec<String>,
    pub components: Vec<Vec<String>>,
}
