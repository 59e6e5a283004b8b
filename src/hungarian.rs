//! Hungarian (Kuhn-Munkres) minimum-cost assignment.
//!
//! Matrix-reduction formulation driven by an explicit state machine:
//! cover the columns holding stars, hunt for uncovered zeros and prime them,
//! augment along alternating prime/star paths, and shift costs when no
//! uncovered zero is left. Zero searches rescan the padded N x N matrix, so
//! the worst case is O(N^4); fine for the batch sizes a single map holds.
//!
//! Infinite cells mark forbidden pairs. Reductions only look at finite
//! values and a cost adjustment with no finite uncovered value stops the
//! search, leaving the largest matching that avoids forbidden cells.

use log::{debug, warn};

/// One matched (row, column) cell, indices into the caller's matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub source_index: usize,
    pub target_index: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssignmentResult {
    pub assignments: Vec<Assignment>,
    /// Sum of the original (unreduced) costs of `assignments`.
    pub total_cost: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mark {
    Plain,
    Star,
    Prime,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    CoverColumns,
    FindZero,
    Augment { row: usize, col: usize },
    AdjustCosts,
    Done,
}

struct Munkres {
    n: usize,
    cost: Vec<Vec<f64>>,
    marks: Vec<Vec<Mark>>,
    row_covered: Vec<bool>,
    col_covered: Vec<bool>,
}

fn finite_min(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
        Some(m) if m <= v => Some(m),
        _ => Some(v),
    })
}

impl Munkres {
    /// Pads `matrix` to a square with zero-cost dummy rows or columns.
    fn new(matrix: &[Vec<f64>], rows: usize, cols: usize) -> Self {
        let n = rows.max(cols);
        let cost = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| matrix.get(i).and_then(|r| r.get(j)).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();
        Self {
            n,
            cost,
            marks: vec![vec![Mark::Plain; n]; n],
            row_covered: vec![false; n],
            col_covered: vec![false; n],
        }
    }

    fn reduce(&mut self) {
        for row in self.cost.iter_mut() {
            if let Some(min) = finite_min(row.iter().copied()) {
                for c in row.iter_mut().filter(|c| c.is_finite()) {
                    *c -= min;
                }
            }
        }
        for j in 0..self.n {
            if let Some(min) = finite_min((0..self.n).map(|i| self.cost[i][j])) {
                for i in 0..self.n {
                    if self.cost[i][j].is_finite() {
                        self.cost[i][j] -= min;
                    }
                }
            }
        }
    }

    fn star_initial_zeros(&mut self) {
        let mut row_starred = vec![false; self.n];
        let mut col_starred = vec![false; self.n];
        for i in 0..self.n {
            for j in 0..self.n {
                if self.cost[i][j] == 0.0 && !row_starred[i] && !col_starred[j] {
                    self.marks[i][j] = Mark::Star;
                    row_starred[i] = true;
                    col_starred[j] = true;
                }
            }
        }
    }

    fn star_in_row(&self, row: usize) -> Option<usize> {
        (0..self.n).find(|&j| self.marks[row][j] == Mark::Star)
    }

    fn star_in_col(&self, col: usize) -> Option<usize> {
        (0..self.n).find(|&i| self.marks[i][col] == Mark::Star)
    }

    fn prime_in_row(&self, row: usize) -> Option<usize> {
        (0..self.n).find(|&j| self.marks[row][j] == Mark::Prime)
    }

    fn uncovered_zero(&self) -> Option<(usize, usize)> {
        for i in (0..self.n).filter(|&i| !self.row_covered[i]) {
            for j in (0..self.n).filter(|&j| !self.col_covered[j]) {
                if self.cost[i][j] == 0.0 {
                    return Some((i, j));
                }
            }
        }
        None
    }

    fn cover_columns(&mut self) -> Step {
        let mut covered = 0;
        for j in 0..self.n {
            self.col_covered[j] = self.star_in_col(j).is_some();
            if self.col_covered[j] {
                covered += 1;
            }
        }
        if covered >= self.n {
            Step::Done
        } else {
            Step::FindZero
        }
    }

    fn find_zero(&mut self) -> Step {
        let Some((row, col)) = self.uncovered_zero() else {
            return Step::AdjustCosts;
        };
        self.marks[row][col] = Mark::Prime;
        match self.star_in_row(row) {
            Some(star_col) => {
                self.row_covered[row] = true;
                self.col_covered[star_col] = false;
                Step::FindZero
            }
            None => Step::Augment { row, col },
        }
    }

    fn augment(&mut self, row: usize, col: usize) -> Step {
        let mut path = vec![(row, col)];
        let mut col = col;
        while let Some(star_row) = self.star_in_col(col) {
            path.push((star_row, col));
            // The star's row was covered when it got primed.
            match self.prime_in_row(star_row) {
                Some(prime_col) => {
                    path.push((star_row, prime_col));
                    col = prime_col;
                }
                None => unreachable!("row {} has a star on the path but no prime", star_row),
            }
        }

        for (i, j) in path {
            self.marks[i][j] = match self.marks[i][j] {
                Mark::Star => Mark::Plain,
                _ => Mark::Star,
            };
        }
        self.row_covered.fill(false);
        self.col_covered.fill(false);
        for mark in self.marks.iter_mut().flatten() {
            if *mark == Mark::Prime {
                *mark = Mark::Plain;
            }
        }
        Step::CoverColumns
    }

    fn adjust_costs(&mut self) -> Step {
        let mut uncovered = Vec::new();
        for i in (0..self.n).filter(|&i| !self.row_covered[i]) {
            for j in (0..self.n).filter(|&j| !self.col_covered[j]) {
                uncovered.push(self.cost[i][j]);
            }
        }
        let Some(min) = finite_min(uncovered.into_iter()) else {
            // Only forbidden cells remain uncovered.
            return Step::Done;
        };

        // Net effect of adding `min` to covered rows and subtracting it from uncovered columns.
        for i in 0..self.n {
            for j in 0..self.n {
                match (self.row_covered[i], self.col_covered[j]) {
                    (true, true) => self.cost[i][j] += min,
                    (false, false) => self.cost[i][j] -= min,
                    _ => {}
                }
            }
        }
        Step::FindZero
    }

    fn run(&mut self) -> usize {
        self.reduce();
        self.star_initial_zeros();
        let mut step = Step::CoverColumns;
        let mut augmentations = 0;
        loop {
            step = match step {
                Step::CoverColumns => self.cover_columns(),
                Step::FindZero => self.find_zero(),
                Step::Augment { row, col } => {
                    augmentations += 1;
                    self.augment(row, col)
                }
                Step::AdjustCosts => self.adjust_costs(),
                Step::Done => break,
            };
        }
        augmentations
    }
}

/// Minimum-cost assignment of rows (sources) to columns (targets).
///
/// Returns `min(rows, cols)` assignments when no cell is infinite. An empty
/// matrix yields no assignments and zero cost. Rows must all have the same length.
pub fn hungarian_assign(matrix: &[Vec<f64>]) -> AssignmentResult {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, |r| r.len());
    if rows == 0 || cols == 0 {
        return AssignmentResult::default();
    }

    let mut munkres = Munkres::new(matrix, rows, cols);
    let augmentations = munkres.run();

    let mut result = AssignmentResult::default();
    for i in 0..rows {
        for j in 0..cols {
            if munkres.marks[i][j] == Mark::Star && matrix[i][j].is_finite() {
                result.assignments.push(Assignment {
                    source_index: i,
                    target_index: j,
                });
                result.total_cost += matrix[i][j];
            }
        }
    }

    debug!(
        "Hungarian solved {}x{} (padded to {}) with {} augmentations, total cost {:.4}",
        rows, cols, munkres.n, augmentations, result.total_cost
    );
    if result.assignments.len() < rows.min(cols) {
        warn!(
            "Only {} of {} pairs could be matched; the rest are forbidden",
            result.assignments.len(),
            rows.min(cols)
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_matrix::naive_cost_from_matrix;
    use proptest::prelude::*;

    fn brute_force_min(matrix: &[Vec<f64>]) -> f64 {
        fn go(matrix: &[Vec<f64>], row: usize, used: &mut Vec<bool>) -> f64 {
            if row == matrix.len() {
                return 0.0;
            }
            let mut best = f64::INFINITY;
            for j in 0..used.len() {
                if !used[j] {
                    used[j] = true;
                    best = best.min(matrix[row][j] + go(matrix, row + 1, used));
                    used[j] = false;
                }
            }
            best
        }
        let rows = matrix.len();
        let cols = matrix[0].len();
        if rows <= cols {
            go(matrix, 0, &mut vec![false; cols])
        } else {
            let transposed: Vec<Vec<f64>> =
                (0..cols).map(|j| (0..rows).map(|i| matrix[i][j]).collect()).collect();
            go(&transposed, 0, &mut vec![false; rows])
        }
    }

    fn assert_feasible(result: &AssignmentResult, rows: usize, cols: usize) {
        assert_eq!(result.assignments.len(), rows.min(cols));
        let mut seen_rows = vec![false; rows];
        let mut seen_cols = vec![false; cols];
        for a in &result.assignments {
            assert!(!seen_rows[a.source_index]);
            assert!(!seen_cols[a.target_index]);
            seen_rows[a.source_index] = true;
            seen_cols[a.target_index] = true;
        }
    }

    #[test]
    fn single_cell() {
        let result = hungarian_assign(&[vec![5.0]]);
        assert_eq!(
            result.assignments,
            vec![Assignment {
                source_index: 0,
                target_index: 0
            }]
        );
        assert_eq!(result.total_cost, 5.0);
    }

    #[test]
    fn empty_matrix() {
        assert_eq!(hungarian_assign(&[]), AssignmentResult::default());
        assert_eq!(hungarian_assign(&[vec![], vec![]]), AssignmentResult::default());
    }

    #[test]
    fn classic_three_by_three() {
        let matrix = vec![
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ];
        let result = hungarian_assign(&matrix);
        assert_feasible(&result, 3, 3);
        assert_eq!(result.total_cost, 5.0);
        let mut pairs: Vec<(usize, usize)> = result
            .assignments
            .iter()
            .map(|a| (a.source_index, a.target_index))
            .collect();
        pairs.sort();
        assert_eq!(pairs, vec![(0, 1), (1, 0), (2, 2)]);
    }

    #[test]
    fn needs_cost_adjustment() {
        // Every row minimum sits in the same column.
        let matrix = vec![
            vec![1.0, 2.0, 3.0],
            vec![1.0, 4.0, 6.0],
            vec![1.0, 6.0, 9.0],
        ];
        let result = hungarian_assign(&matrix);
        assert_feasible(&result, 3, 3);
        assert_eq!(result.total_cost, brute_force_min(&matrix));
        assert_eq!(result.total_cost, 1.0 + 3.0 + 4.0);
    }

    #[test]
    fn more_targets_than_sources() {
        let matrix = vec![vec![1.0, 10.0, 3.0], vec![1.0, 10.0, 3.0]];
        let result = hungarian_assign(&matrix);
        assert_feasible(&result, 2, 3);
        assert_eq!(result.total_cost, 4.0);
        assert!(result.assignments.iter().all(|a| a.target_index != 1));
    }

    #[test]
    fn more_sources_than_targets() {
        let matrix = vec![vec![1.0, 1.0], vec![10.0, 10.0], vec![3.0, 3.0]];
        let result = hungarian_assign(&matrix);
        assert_feasible(&result, 3, 2);
        assert_eq!(result.total_cost, 4.0);
        assert!(result.assignments.iter().all(|a| a.source_index != 1));
    }

    #[test]
    fn forbidden_cells_are_never_matched() {
        let inf = f64::INFINITY;
        let matrix = vec![vec![inf, 1.0], vec![inf, 2.0]];
        let result = hungarian_assign(&matrix);
        assert_eq!(
            result.assignments,
            vec![Assignment {
                source_index: 0,
                target_index: 1
            }]
        );
        assert_eq!(result.total_cost, 1.0);
    }

    #[test]
    fn deterministic() {
        let matrix = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        let first = hungarian_assign(&matrix);
        for _ in 0..5 {
            assert_eq!(hungarian_assign(&matrix), first);
        }
    }

    fn matrix_strategy() -> impl Strategy<Value = Vec<Vec<f64>>> {
        (1usize..=6, 1usize..=6).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(prop::collection::vec(0.0f64..100.0, cols), rows)
        })
    }

    proptest! {
        #[test]
        fn matches_brute_force(matrix in matrix_strategy()) {
            let rows = matrix.len();
            let cols = matrix[0].len();
            let result = hungarian_assign(&matrix);
            assert_feasible(&result, rows, cols);
            let best = brute_force_min(&matrix);
            prop_assert!((result.total_cost - best).abs() < 1e-6,
                "hungarian {} vs brute force {}", result.total_cost, best);
        }

        #[test]
        fn naive_never_beats_optimal(matrix in matrix_strategy()) {
            let result = hungarian_assign(&matrix);
            prop_assert!(naive_cost_from_matrix(&matrix) + 1e-6 >= result.total_cost);
        }
    }
}
