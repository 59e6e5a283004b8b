use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::cost_matrix::Node;
use crate::geo::Metric;
use crate::union_find::UnionFind;

/// Undirected weighted edge between two node ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: String,
    pub v: String,
    pub weight: f64,
}

impl Edge {
    pub fn new(u: impl Into<String>, v: impl Into<String>, weight: f64) -> Self {
        Self {
            u: u.into(),
            v: v.into(),
            weight,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MstResult {
    /// Accepted edges, in the order Kruskal picked them (ascending weight).
    pub edges: Vec<Edge>,
    pub total_weight: f64,
}

impl MstResult {
    /// Number of trees in the forest spanning `node_count` nodes.
    pub fn component_count(&self, node_count: usize) -> usize {
        node_count.saturating_sub(self.edges.len())
    }
}

/// One edge per unordered pair of `nodes`, weighted by distance under `metric`.
pub fn complete_graph_edges(nodes: &[Node], metric: Metric) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(nodes.len() * nodes.len().saturating_sub(1) / 2);
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            edges.push(Edge::new(a.id.clone(), b.id.clone(), metric.distance(a, b)));
        }
    }
    edges
}

/// Kruskal's minimum spanning forest.
///
/// Every edge is considered, so a disconnected input yields one tree per
/// component rather than an error. Edges may name ids missing from `node_ids`.
pub fn kruskal_mst<S: AsRef<str>>(node_ids: &[S], edges: &[Edge]) -> MstResult {
    let mut sorted: Vec<&Edge> = edges.iter().collect();
    sorted.sort_by_key(|e| OrderedFloat(e.weight));

    let mut components: UnionFind<&str> = UnionFind::new();
    for id in node_ids {
        components.insert(id.as_ref());
    }

    let mut result = MstResult::default();
    for edge in sorted {
        if components.union(&edge.u.as_str(), &edge.v.as_str()) {
            result.total_weight += edge.weight;
            result.edges.push(edge.clone());
        }
    }

    log::debug!(
        "Kruskal kept {} of {} edges over {} nodes, total weight {:.4}",
        result.edges.len(),
        edges.len(),
        components.len(),
        result.total_weight
    );
    result
}

/// Minimum spanning forest over the complete graph of `nodes`.
///
/// Vertices are node positions, not ids, so nodes from different role sets
/// that happen to share an id stay distinct. Output edges carry the ids.
pub fn node_spanning_tree(nodes: &[Node], metric: Metric) -> MstResult {
    let mut candidates = Vec::with_capacity(nodes.len() * nodes.len().saturating_sub(1) / 2);
    for (i, a) in nodes.iter().enumerate() {
        for (j, b) in nodes.iter().enumerate().skip(i + 1) {
            candidates.push((i, j, metric.distance(a, b)));
        }
    }
    candidates.sort_by_key(|&(_, _, w)| OrderedFloat(w));

    let mut components: UnionFind<usize> = UnionFind::new();
    for i in 0..nodes.len() {
        components.insert(i);
    }

    let mut result = MstResult::default();
    for (i, j, weight) in candidates {
        if components.union(&i, &j) {
            result.total_weight += weight;
            result
                .edges
                .push(Edge::new(nodes[i].id.clone(), nodes[j].id.clone(), weight));
        }
    }
    result
}
