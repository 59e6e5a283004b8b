//! Optimal driver/passenger matching and minimum-connectivity backbones.
//!
//! Build a cost matrix from two node sets, solve it with the Hungarian
//! algorithm, compare against a naive in-order pairing, and span every node
//! with Kruskal's MST. Dijkstra is provided for graphs with explicit edges.

pub mod cost_matrix;
pub mod dijkstra;
pub mod generate;
pub mod geo;
pub mod hungarian;
pub mod io;
pub mod kruskal;
pub mod report;
pub mod union_find;

pub use cost_matrix::{build_cost_matrix, naive_assignment_cost, CostMatrix, CostOptions, Node, Pair};
pub use dijkstra::{dijkstra, graph_from_edges, Adjacent, Graph, ShortestPaths};
pub use geo::{euclidean_distance, haversine_distance, Metric};
pub use hungarian::{hungarian_assign, Assignment, AssignmentResult};
pub use kruskal::{complete_graph_edges, kruskal_mst, node_spanning_tree, Edge, MstResult};
pub use report::MatchingReport;
pub use union_find::UnionFind;
