use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

use fnv::FnvHashMap;
use hashbrown::HashMap;
use ordered_float::OrderedFloat;

use crate::kruskal::Edge;

/// Outgoing edge of an adjacency list.
#[derive(Clone, Debug, PartialEq)]
pub struct Adjacent {
    pub neighbor_id: String,
    pub weight: f64,
}

impl Adjacent {
    pub fn new(neighbor_id: impl Into<String>, weight: f64) -> Self {
        Self {
            neighbor_id: neighbor_id.into(),
            weight,
        }
    }
}

/// Adjacency list keyed by node id. Weights must be non-negative.
pub type Graph = HashMap<String, Vec<Adjacent>>;

/// Builds a graph from an edge list; undirected edges are stored in both directions.
pub fn graph_from_edges(edges: &[Edge], directed: bool) -> Graph {
    let mut graph = Graph::new();
    for edge in edges {
        graph
            .entry(edge.u.clone())
            .or_default()
            .push(Adjacent::new(edge.v.clone(), edge.weight));
        if !directed {
            graph
                .entry(edge.v.clone())
                .or_default()
                .push(Adjacent::new(edge.u.clone(), edge.weight));
        }
    }
    graph
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShortestPaths {
    /// `f64::INFINITY` when unreachable.
    pub distances: HashMap<String, f64>,
    /// `None` for the source and for unreachable nodes.
    pub predecessors: HashMap<String, Option<String>>,
}

impl ShortestPaths {
    pub fn distance(&self, id: &str) -> f64 {
        self.distances.get(id).copied().unwrap_or(f64::INFINITY)
    }

    pub fn predecessor(&self, id: &str) -> Option<&str> {
        self.predecessors.get(id).and_then(|p| p.as_deref())
    }

    /// Ids from the source to `target`, both included. `None` if unreachable.
    pub fn path_to(&self, target: &str) -> Option<Vec<String>> {
        if !self.distance(target).is_finite() {
            return None;
        }
        let mut path = vec![target.to_string()];
        let mut cur = target;
        while let Some(prev) = self.predecessor(cur) {
            path.push(prev.to_string());
            cur = prev;
        }
        path.reverse();
        Some(path)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
struct State {
    cost: OrderedFloat<f64>,
    node_id: usize,
}

// Min-heap by cost, ties broken by lower index.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node_id.cmp(&self.node_id))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra from `start` to all nodes of an index-based adjacency list.
/// Returns distances (`f64::INFINITY` when unreachable) and predecessors.
fn dijkstra_all(adj: &[Vec<(usize, f64)>], start: usize) -> (Vec<f64>, Vec<Option<usize>>) {
    let n = adj.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut prev = vec![None; n];
    let mut visited = vec![false; n];
    let mut heap = BinaryHeap::new();

    dist[start] = 0.0;
    heap.push(State {
        cost: OrderedFloat(0.0),
        node_id: start,
    });

    while let Some(State { cost, node_id }) = heap.pop() {
        // Stale entries left behind by later improvements.
        if visited[node_id] {
            continue;
        }
        visited[node_id] = true;
        for &(next, w) in &adj[node_id] {
            let next_cost = cost.0 + w;
            if next_cost < dist[next] {
                dist[next] = next_cost;
                prev[next] = Some(node_id);
                heap.push(State {
                    cost: OrderedFloat(next_cost),
                    node_id: next,
                });
            }
        }
    }
    (dist, prev)
}

/// Single-source shortest paths over `graph`.
///
/// The node set is every key plus every neighbor id. A source missing from the
/// graph still gets distance 0.
pub fn dijkstra(graph: &Graph, source: &str) -> ShortestPaths {
    // Sorted ids keep tie-breaking independent of hash order.
    let mut ids: BTreeSet<&str> = BTreeSet::new();
    ids.insert(source);
    for (id, neighbors) in graph {
        ids.insert(id.as_str());
        for n in neighbors {
            ids.insert(n.neighbor_id.as_str());
        }
    }

    let idx_to_id: Vec<&str> = ids.into_iter().collect();
    let id_to_idx: FnvHashMap<&str, usize> = idx_to_id
        .iter()
        .enumerate()
        .map(|(idx, &id)| (id, idx))
        .collect();

    let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); idx_to_id.len()];
    for (id, neighbors) in graph {
        let u = id_to_idx[id.as_str()];
        for n in neighbors {
            adj[u].push((id_to_idx[n.neighbor_id.as_str()], n.weight));
        }
    }

    let (dist, prev) = dijkstra_all(&adj, id_to_idx[source]);

    let mut result = ShortestPaths::default();
    for (idx, &id) in idx_to_id.iter().enumerate() {
        result.distances.insert(id.to_string(), dist[idx]);
        result
            .predecessors
            .insert(id.to_string(), prev[idx].map(|p| idx_to_id[p].to_string()));
    }

    log::debug!(
        "Dijkstra from {}: {} of {} nodes reachable",
        source,
        dist.iter().filter(|d| d.is_finite()).count(),
        dist.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_hop() {
        let mut graph = Graph::new();
        graph.insert("A".to_string(), vec![Adjacent::new("B", 5.0)]);
        let sp = dijkstra(&graph, "A");
        assert_eq!(sp.distances.len(), 2);
        assert_eq!(sp.distance("A"), 0.0);
        assert_eq!(sp.distance("B"), 5.0);
        assert_eq!(sp.predecessor("B"), Some("A"));
        assert_eq!(sp.predecessor("A"), None);
    }

    #[test]
    fn unreachable_node() {
        let mut graph = Graph::new();
        graph.insert("A".to_string(), vec![Adjacent::new("B", 1.0)]);
        graph.insert("C".to_string(), vec![]);
        let sp = dijkstra(&graph, "A");
        assert_eq!(sp.distance("C"), f64::INFINITY);
        assert_eq!(sp.predecessors.get("C"), Some(&None));
        assert_eq!(sp.path_to("C"), None);
    }

    #[test]
    fn missing_source() {
        let sp = dijkstra(&Graph::new(), "lonely");
        assert_eq!(sp.distances.len(), 1);
        assert_eq!(sp.distance("lonely"), 0.0);
    }

    #[test]
    fn sample_graph() {
        let edges = vec![
            Edge::new("0", "1", 0.0),
            Edge::new("0", "2", 1.0),
            Edge::new("0", "7", 5.0),
            Edge::new("1", "3", 3.0),
            Edge::new("1", "4", 2.0),
            Edge::new("2", "4", 3.0),
            Edge::new("2", "5", 2.0),
            Edge::new("3", "6", 2.0),
            Edge::new("4", "6", 2.0),
            Edge::new("6", "8", 3.0),
            Edge::new("7", "9", 2.0),
            Edge::new("8", "10", 1.0),
            Edge::new("9", "10", 2.0),
        ];
        let graph = graph_from_edges(&edges, true);
        let sp = dijkstra(&graph, "0");

        let expected = [0.0, 0.0, 1.0, 3.0, 2.0, 3.0, 4.0, 5.0, 7.0, 7.0, 8.0];
        for (i, &d) in expected.iter().enumerate() {
            assert_eq!(sp.distance(&i.to_string()), d, "node {}", i);
        }
        assert_eq!(
            sp.path_to("10"),
            Some(vec!["0", "1", "4", "6", "8", "10"].into_iter().map(String::from).collect())
        );
    }

    #[test]
    fn undirected_edges_go_both_ways() {
        let edges = vec![Edge::new("A", "B", 2.0), Edge::new("B", "C", 2.0)];
        let sp = dijkstra(&graph_from_edges(&edges, false), "C");
        assert_eq!(sp.distance("A"), 4.0);
        assert_eq!(
            sp.path_to("A"),
            Some(vec!["C".to_string(), "B".to_string(), "A".to_string()])
        );
        let sp = dijkstra(&graph_from_edges(&edges, true), "C");
        assert_eq!(sp.distance("A"), f64::INFINITY);
    }

    #[test]
    fn shorter_detour_wins() {
        let edges = vec![
            Edge::new("S", "T", 10.0),
            Edge::new("S", "M", 3.0),
            Edge::new("M", "T", 4.0),
        ];
        let sp = dijkstra(&graph_from_edges(&edges, true), "S");
        assert_eq!(sp.distance("T"), 7.0);
        assert_eq!(sp.predecessor("T"), Some("M"));
    }
}
