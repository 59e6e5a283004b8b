use serde::{Deserialize, Serialize};

use crate::geo::Metric;

/// A geolocated entity, a driver or a passenger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
}

impl Node {
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lng,
        }
    }
}

/// One cell of the cost matrix, keyed by node ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub source_id: String,
    pub target_id: String,
    pub cost: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CostOptions {
    pub metric: Metric,
    /// Linear factor turning distance into cost (e.g. minutes per km).
    pub cost_per_unit_distance: f64,
}

impl Default for CostOptions {
    fn default() -> Self {
        Self {
            metric: Metric::Euclidean,
            cost_per_unit_distance: 2.0,
        }
    }
}

impl CostOptions {
    pub fn cost(&self, source: &Node, target: &Node) -> f64 {
        self.metric.distance(source, target) * self.cost_per_unit_distance
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CostMatrix {
    /// `matrix[i][j]` is the cost of pairing source `i` with target `j`.
    pub matrix: Vec<Vec<f64>>,
    /// Row-major view of `matrix`.
    pub pairs: Vec<Pair>,
}

impl CostMatrix {
    pub fn rows(&self) -> usize {
        self.matrix.len()
    }

    pub fn cols(&self) -> usize {
        self.matrix.first().map_or(0, |r| r.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.cols() == 0
    }
}

/// Builds the `|sources| x |targets|` cost matrix. An empty side gives an empty matrix.
pub fn build_cost_matrix(sources: &[Node], targets: &[Node], options: &CostOptions) -> CostMatrix {
    if sources.is_empty() || targets.is_empty() {
        return CostMatrix::default();
    }

    let mut matrix = Vec::with_capacity(sources.len());
    let mut pairs = Vec::with_capacity(sources.len() * targets.len());
    for source in sources {
        let mut row = Vec::with_capacity(targets.len());
        for target in targets {
            let cost = options.cost(source, target);
            row.push(cost);
            pairs.push(Pair {
                source_id: source.id.clone(),
                target_id: target.id.clone(),
                cost,
            });
        }
        matrix.push(row);
    }

    log::debug!(
        "Built {}x{} cost matrix ({} metric, {} per unit)",
        sources.len(),
        targets.len(),
        options.metric,
        options.cost_per_unit_distance
    );
    CostMatrix { matrix, pairs }
}

/// Baseline cost of pairing the i-th source with the i-th target.
pub fn naive_assignment_cost(sources: &[Node], targets: &[Node], options: &CostOptions) -> f64 {
    sources
        .iter()
        .zip(targets)
        .map(|(source, target)| options.cost(source, target))
        .sum()
}

/// Same baseline, read off the diagonal of an existing matrix.
pub fn naive_cost_from_matrix(matrix: &[Vec<f64>]) -> f64 {
    let cols = matrix.first().map_or(0, |r| r.len());
    (0..matrix.len().min(cols)).map(|i| matrix[i][i]).sum()
}
