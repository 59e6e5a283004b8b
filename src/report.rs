//! End-to-end comparison of a naive pairing against the optimal one.

use crate::cost_matrix::{build_cost_matrix, naive_assignment_cost, CostOptions, Node, Pair};
use crate::hungarian::hungarian_assign;
use crate::kruskal::{node_spanning_tree, MstResult};

#[derive(Clone, Debug, PartialEq)]
pub struct MatchingReport {
    /// Optimal driver -> passenger pairs.
    pub assignments: Vec<Pair>,
    pub optimal_total: f64,
    /// Cost of pairing the i-th driver with the i-th passenger.
    pub naive_total: f64,
    /// Spanning tree over drivers and passengers together, weighted by distance.
    pub mst: MstResult,
}

impl MatchingReport {
    pub fn compute(drivers: &[Node], passengers: &[Node], options: &CostOptions) -> Self {
        let costs = build_cost_matrix(drivers, passengers, options);
        let optimal = hungarian_assign(&costs.matrix);
        let assignments = optimal
            .assignments
            .iter()
            .map(|a| Pair {
                source_id: drivers[a.source_index].id.clone(),
                target_id: passengers[a.target_index].id.clone(),
                cost: costs.matrix[a.source_index][a.target_index],
            })
            .collect();

        let naive_total = naive_assignment_cost(drivers, passengers, options);

        let all_nodes: Vec<Node> = drivers.iter().chain(passengers).cloned().collect();
        // Ids are only unique within a role, so the tree works on positions.
        let mst = node_spanning_tree(&all_nodes, options.metric);

        Self {
            assignments,
            optimal_total: optimal.total_cost,
            naive_total,
            mst,
        }
    }

    pub fn savings(&self) -> f64 {
        self.naive_total - self.optimal_total
    }

    pub fn savings_percent(&self) -> f64 {
        if self.naive_total > 0.0 {
            self.savings() / self.naive_total * 100.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossed_pairs_get_uncrossed() {
        let drivers = vec![Node::new("D1", 0.0, 0.0), Node::new("D2", 10.0, 0.0)];
        let passengers = vec![Node::new("P1", 10.0, 1.0), Node::new("P2", 0.0, 1.0)];
        let report = MatchingReport::compute(&drivers, &passengers, &CostOptions::default());

        assert_eq!(report.assignments.len(), 2);
        let d1 = report
            .assignments
            .iter()
            .find(|p| p.source_id == "D1")
            .map(|p| p.target_id.as_str());
        assert_eq!(d1, Some("P2"));
        assert!((report.optimal_total - 4.0).abs() < 1e-9);
        assert!(report.naive_total > report.optimal_total);
        assert!(report.savings() > 0.0);
        assert!(report.savings_percent() > 90.0);
        assert_eq!(report.mst.edges.len(), 3);
    }

    #[test]
    fn shared_ids_across_roles() {
        let drivers = vec![Node::new("1", 0.0, 0.0), Node::new("2", 10.0, 0.0)];
        let passengers = vec![Node::new("1", 0.0, 1.0), Node::new("2", 10.0, 1.0)];
        let report = MatchingReport::compute(&drivers, &passengers, &CostOptions::default());

        assert_eq!(report.assignments.len(), 2);
        assert!(report.assignments.iter().all(|p| p.source_id == p.target_id));
        assert_eq!(report.mst.edges.len(), 3);
        assert_eq!(report.mst.total_weight, 12.0);
    }

    #[test]
    fn no_passengers() {
        let drivers = vec![Node::new("D1", 0.0, 0.0), Node::new("D2", 3.0, 4.0)];
        let report = MatchingReport::compute(&drivers, &[], &CostOptions::default());
        assert!(report.assignments.is_empty());
        assert_eq!(report.optimal_total, 0.0);
        assert_eq!(report.naive_total, 0.0);
        assert_eq!(report.savings_percent(), 0.0);
        assert_eq!(report.mst.edges.len(), 1);
        assert_eq!(report.mst.total_weight, 5.0);
    }
}
