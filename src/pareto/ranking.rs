//! Pareto ranking and crowding distance.
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//!   with constrained dominance
//! - [`rank`]: Splits a population into owned fronts and annotates ranks
//! - [`crowding_distance`] / [`assign_crowding_distance`]: Crowding distance
//!   for diversity preservation
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use crate::solution::{Population, Solution};
use std::cmp::Ordering;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, Default)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    /// Indices inside a front are ascending.
    pub fronts: Vec<Vec<usize>>,
}

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two solutions under constrained Pareto dominance (minimization).
///
/// When either solution is infeasible the violation degree decides alone:
/// a feasible solution dominates an infeasible one, and between two
/// infeasible solutions the lower violation dominates. Objectives are only
/// compared when both are feasible.
pub fn dominance<V>(a: &Solution<V>, b: &Solution<V>) -> Dominance {
    match (a.is_feasible(), b.is_feasible()) {
        (true, true) => objective_dominance(a.objectives(), b.objectives()),
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        (false, false) => {
            match a
                .constraint_violation()
                .partial_cmp(&b.constraint_violation())
            {
                Some(Ordering::Less) => Dominance::Left,
                Some(Ordering::Greater) => Dominance::Right,
                _ => Dominance::Neither,
            }
        }
    }
}

/// Compares two objective vectors for Pareto dominance (minimization).
pub fn objective_dominance(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on constrained dominance.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of solutions, determine dominance
/// 2. Solutions dominated by no other belong to front 0 (rank 0)
/// 3. Remove front 0, repeat to find subsequent fronts
///
/// An empty input yields no fronts.
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_moea::pareto::non_dominated_sort;
/// use u_moea::solution::Solution;
///
/// let solutions = vec![
///     Solution::with_objectives((), vec![1.0, 5.0]),
///     Solution::with_objectives((), vec![3.0, 3.0]),
///     Solution::with_objectives((), vec![5.0, 1.0]),
///     Solution::with_objectives((), vec![4.0, 4.0]), // dominated by (3, 3)
/// ];
///
/// let result = non_dominated_sort(&solutions);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// ```
pub fn non_dominated_sort<V>(solutions: &[Solution<V>]) -> NondominatedSortResult {
    let n = solutions.len();
    if n == 0 {
        return NondominatedSortResult::default();
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];
    let mut front_0 = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance(&solutions[i], &solutions[j]) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }

        if domination_count[i] == 0 {
            front_0.push(i);
        }
    }

    let mut fronts = vec![front_0];
    loop {
        let current = &fronts[fronts.len() - 1];
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        // Discovery order depends on the previous front; input order is the
        // tie-break downstream sorts rely on.
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

/// Ranks a population into owned fronts.
///
/// Every solution ends up in exactly one front, with its `rank` annotation
/// set to the front index. Solutions keep their relative input order within
/// a front.
pub fn rank<V>(population: Population<V>) -> Vec<Population<V>> {
    let result = non_dominated_sort(population.as_slice());

    let mut slots: Vec<Option<Solution<V>>> = population.into_iter().map(Some).collect();
    result
        .fronts
        .iter()
        .enumerate()
        .map(|(front_idx, indices)| {
            indices
                .iter()
                .filter_map(|&i| slots[i].take())
                .map(|mut s| {
                    s.set_rank(front_idx);
                    s
                })
                .collect()
        })
        .collect()
}

/// Returns the non-dominated subset (front 0) of a population.
pub fn non_dominated<V>(population: Population<V>) -> Population<V> {
    rank(population).into_iter().next().unwrap_or_default()
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective with a non-zero range)
/// receive `f64::INFINITY`. An objective with zero range contributes
/// nothing to any solution, boundaries included.
///
/// # Algorithm (Deb et al., 2002)
///
/// For each objective:
/// 1. Sort solutions by objective value (stable)
/// 2. Assign infinity to boundary solutions
/// 3. For interior solutions, add normalized distance to neighbors
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_moea::pareto::crowding_distance;
///
/// let objectives = vec![
///     vec![1.0, 4.0],
///     vec![2.0, 3.0],
///     vec![4.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&objectives);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!((distances[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .partial_cmp(&objectives[b][obj_idx])
                .unwrap_or(Ordering::Equal)
        });

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;
        // A constant axis has no boundary members.
        if range <= 0.0 || range.is_nan() {
            continue;
        }

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        for i in 1..(n - 1) {
            let prev = objectives[indices[i - 1]][obj_idx];
            let next = objectives[indices[i + 1]][obj_idx];
            // inf + x stays inf
            distances[indices[i]] += (next - prev) / range;
        }
    }

    distances
}

/// Writes crowding distances into the `crowding` annotation of every
/// member of `front`, replacing whatever was there.
///
/// Only the first `number_of_objectives` objectives are considered.
pub fn assign_crowding_distance<V>(front: &mut Population<V>, number_of_objectives: usize) {
    let objectives: Vec<Vec<f64>> = front
        .iter()
        .map(|s| {
            let objs = s.objectives();
            objs[..number_of_objectives.min(objs.len())].to_vec()
        })
        .collect();

    for (solution, distance) in front.iter_mut().zip(crowding_distance(&objectives)) {
        solution.set_crowding(distance);
    }
}

/// Crowded comparison: lower rank first, then larger crowding distance.
///
/// `Ordering::Less` means `a` is preferred.
pub fn crowded_comparison<V>(a: &Solution<V>, b: &Solution<V>) -> Ordering {
    a.rank()
        .cmp(&b.rank())
        .then_with(|| {
            b.crowding()
                .partial_cmp(&a.crowding())
                .unwrap_or(Ordering::Equal)
        })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sols(objs: &[&[f64]]) -> Vec<Solution<usize>> {
        objs.iter()
            .enumerate()
            .map(|(i, o)| Solution::with_objectives(i, o.to_vec()))
            .collect()
    }

    fn infeasible(id: usize, objs: &[f64], violation: f64) -> Solution<usize> {
        let mut s = Solution::with_objectives(id, objs.to_vec());
        s.set_constraint_violation(violation);
        s
    }

    // ---- Non-dominated sort ----

    #[test]
    fn test_empty_population() {
        let result = non_dominated_sort::<()>(&[]);
        assert!(result.ranks.is_empty());
        assert!(result.fronts.is_empty());
        assert!(rank(Population::<()>::new()).is_empty());
    }

    #[test]
    fn test_single_solution() {
        let result = non_dominated_sort(&sols(&[&[1.0, 2.0]]));
        assert_eq!(result.ranks, vec![0]);
        assert_eq!(result.fronts, vec![vec![0]]);
    }

    #[test]
    fn test_two_non_dominated() {
        let result = non_dominated_sort(&sols(&[&[1.0, 5.0], &[5.0, 1.0]]));
        assert_eq!(result.ranks, vec![0, 0]);
        assert_eq!(result.fronts.len(), 1);
    }

    #[test]
    fn test_clear_dominance() {
        let result = non_dominated_sort(&sols(&[&[3.0, 3.0], &[1.0, 1.0], &[2.0, 2.0]]));
        assert_eq!(result.ranks, vec![2, 0, 1]);
        assert_eq!(result.fronts, vec![vec![1], vec![2], vec![0]]);
    }

    #[test]
    fn test_mixed_fronts() {
        let result = non_dominated_sort(&sols(&[
            &[1.0, 5.0], // front 0
            &[3.0, 3.0], // front 0
            &[5.0, 1.0], // front 0
            &[4.0, 4.0], // dominated by (3,3) → front 1
            &[6.0, 6.0], // dominated by (4,4) → front 2
        ]));
        assert_eq!(result.ranks, vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn test_all_equal() {
        let result = non_dominated_sort(&sols(&[&[2.0, 2.0], &[2.0, 2.0], &[2.0, 2.0]]));
        // identical solutions don't dominate each other
        assert_eq!(result.fronts, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_later_front_keeps_input_order() {
        // (1,6) is freed through (0,5) before (6,1) is freed through (5,0)
        let result = non_dominated_sort(&sols(&[
            &[6.0, 1.0],
            &[0.0, 5.0],
            &[5.0, 0.0],
            &[1.0, 6.0],
        ]));
        assert_eq!(result.fronts[0], vec![1, 2]);
        assert_eq!(result.fronts[1], vec![0, 3]);
    }

    #[test]
    fn test_feasible_dominates_infeasible() {
        let solutions = vec![
            infeasible(0, &[0.0, 0.0], 0.5),
            Solution::with_objectives(1, vec![9.0, 9.0]),
        ];
        assert_eq!(dominance(&solutions[1], &solutions[0]), Dominance::Left);
        let result = non_dominated_sort(&solutions);
        assert_eq!(result.ranks, vec![1, 0]);
    }

    #[test]
    fn test_infeasible_compared_by_violation_only() {
        let a = infeasible(0, &[9.0, 9.0], 0.1);
        let b = infeasible(1, &[0.0, 0.0], 0.2);
        assert_eq!(dominance(&a, &b), Dominance::Left);

        let c = infeasible(2, &[0.0, 0.0], 0.1);
        assert_eq!(dominance(&a, &c), Dominance::Neither);
    }

    #[test]
    fn test_rank_assigns_annotations() {
        let pop: Population<usize> = sols(&[&[1.0, 4.0], &[2.0, 5.0], &[4.0, 1.0]])
            .into_iter()
            .collect();
        let fronts = rank(pop);
        assert_eq!(fronts.len(), 2);
        assert_eq!(fronts[0].len(), 2);
        assert!(fronts[0].iter().all(|s| s.rank() == 0));
        assert_eq!(*fronts[1][0].variables(), 1);
        assert_eq!(fronts[1][0].rank(), 1);
    }

    #[test]
    fn test_three_objectives() {
        let result = non_dominated_sort(&sols(&[
            &[1.0, 5.0, 3.0],
            &[3.0, 1.0, 5.0],
            &[5.0, 3.0, 1.0],
            &[4.0, 4.0, 4.0], // incomparable with each of the above
        ]));
        assert!(result.ranks.iter().all(|&r| r == 0));
    }

    // ---- Crowding distance ----

    #[test]
    fn test_crowding_single() {
        let dist = crowding_distance(&[vec![1.0, 2.0]]);
        assert_eq!(dist.len(), 1);
        assert!(dist[0].is_infinite());
    }

    #[test]
    fn test_crowding_two() {
        let dist = crowding_distance(&[vec![1.0, 5.0], vec![5.0, 1.0]]);
        assert!(dist.iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn test_crowding_three_points() {
        let dist = crowding_distance(&[vec![1.0, 4.0], vec![2.0, 3.0], vec![4.0, 1.0]]);
        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        assert!((dist[1] - 2.0).abs() < 1e-12, "got {}", dist[1]);
    }

    #[test]
    fn test_crowding_evenly_spaced() {
        let dist = crowding_distance(&[
            vec![0.0, 4.0],
            vec![1.0, 3.0],
            vec![2.0, 2.0],
            vec![3.0, 1.0],
            vec![4.0, 0.0],
        ]);
        assert!(dist[0].is_infinite());
        assert!(dist[4].is_infinite());
        for d in &dist[1..4] {
            assert!((d - 1.0).abs() < 1e-12, "expected 1.0, got {d}");
        }
    }

    #[test]
    fn test_crowding_zero_range_objective() {
        let dist = crowding_distance(&[vec![1.0, 5.0], vec![2.0, 5.0], vec![3.0, 5.0]]);
        assert!(dist[0].is_infinite());
        assert!(dist[2].is_infinite());
        // Only objective 0 contributes: (3 - 1) / (3 - 1)
        assert!((dist[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_crowding_constant_objective_marks_no_boundary() {
        // axis 1 is constant; only axis 0 decides the boundaries
        let dist = crowding_distance(&[vec![2.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]]);
        assert!((dist[0] - 1.0).abs() < 1e-12, "got {}", dist[0]);
        assert!(dist[1].is_infinite());
        assert!(dist[2].is_infinite());
    }

    #[test]
    fn test_crowding_all_identical() {
        let dist = crowding_distance(&[vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert_eq!(dist, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_assign_overwrites_previous_value() {
        let mut front: Population<usize> =
            sols(&[&[1.0, 4.0], &[2.0, 3.0], &[4.0, 1.0]]).into_iter().collect();
        front[1].set_crowding(99.0);
        assign_crowding_distance(&mut front, 2);
        assert!((front[1].crowding() - 2.0).abs() < 1e-12);
        assert!(front[0].crowding().is_infinite());
    }

    #[test]
    fn test_crowded_comparison() {
        let mut a = Solution::with_objectives((), vec![0.0]);
        let mut b = Solution::with_objectives((), vec![0.0]);
        a.set_rank(0);
        b.set_rank(1);
        b.set_crowding(f64::INFINITY);
        assert_eq!(crowded_comparison(&a, &b), Ordering::Less);

        b.set_rank(0);
        a.set_crowding(1.0);
        assert_eq!(crowded_comparison(&a, &b), Ordering::Greater);
    }

    // ---- Properties ----

    fn objective_sets() -> impl Strategy<Value = Vec<Vec<f64>>> {
        // Small integer grid to force ties and duplicates.
        prop::collection::vec(
            prop::collection::vec((0u8..6).prop_map(f64::from), 2..4),
            0..40,
        )
        .prop_map(|mut rows| {
            let m = rows.iter().map(Vec::len).min().unwrap_or(0);
            for row in &mut rows {
                row.truncate(m);
            }
            rows
        })
    }

    proptest! {
        #[test]
        fn prop_fronts_partition_population(objs in objective_sets()) {
            let pop: Population<usize> = objs
                .iter()
                .enumerate()
                .map(|(i, o)| Solution::with_objectives(i, o.clone()))
                .collect();
            let n = pop.len();
            let fronts = rank(pop);

            let mut seen = vec![false; n];
            for front in &fronts {
                prop_assert!(!front.is_empty());
                for s in front {
                    prop_assert!(!seen[*s.variables()], "solution in two fronts");
                    seen[*s.variables()] = true;
                }
            }
            prop_assert!(seen.iter().all(|&b| b));
            prop_assert_eq!(fronts.iter().map(Population::len).sum::<usize>(), n);

            if let Some(front_0) = fronts.first() {
                for a in front_0 {
                    for b in front_0 {
                        prop_assert_eq!(dominance(a, b), Dominance::Neither);
                    }
                }
            }

            // Nothing in front i is dominated by anything in front >= i
            for (i, front) in fronts.iter().enumerate() {
                for later in &fronts[i..] {
                    for a in front {
                        for b in later {
                            prop_assert_ne!(dominance(b, a), Dominance::Left);
                        }
                    }
                }
            }
        }

        #[test]
        fn prop_crowding_is_non_negative(objs in objective_sets()) {
            let dist = crowding_distance(&objs);
            prop_assert_eq!(dist.len(), objs.len());
            prop_assert!(dist.iter().all(|&d| d >= 0.0 && !d.is_nan()));
        }
    }
}
