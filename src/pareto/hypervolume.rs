//! Hypervolume indicator and per-point hypervolume contributions.
//!
//! All objectives are minimized. The hypervolume of a set is the measure of
//! the region dominated by the set and bounded by a reference point that is
//! worse than every point in every objective. Points that do not strictly
//! dominate the reference point add nothing.
//!
//! # Algorithms
//!
//! - 1 objective: gap between the best point and the reference
//! - 2 objectives: staircase sweep, O(n log n)
//! - 3+ objectives: slicing on the last objective (HSO), recursing into
//!   the remaining objectives
//!
//! [`contributions`] computes the exclusive contribution of every point in
//! one pass over the same slices: the contribution of a point is the sum,
//! over the slabs it is active in, of slab depth times its contribution to
//! the projected slice. The 2-objective base case is exact in closed form,
//! including points that are only covered by the point being removed.
//!
//! # References
//!
//! - Zitzler & Thiele (1999), "Multiobjective Evolutionary Algorithms: A
//!   Comparative Case Study and the Strength Pareto Approach"
//! - While et al. (2006), "A Faster Algorithm for Calculating Hypervolume"
//! - Emmerich, Beume & Naujoks (2005), "An EMO Algorithm Using the
//!   Hypervolume Measure as Selection Criterion"

use crate::solution::Population;
use std::cmp::Ordering;

/// How the hypervolume reference point is obtained.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HypervolumeReference {
    /// A fixed reference point, one value per objective.
    Point(Vec<f64>),

    /// The worst observed value per objective plus this margin.
    Offset(f64),
}

impl Default for HypervolumeReference {
    fn default() -> Self {
        HypervolumeReference::Offset(100.0)
    }
}

impl HypervolumeReference {
    /// Resolves the reference point for a set of objective vectors.
    ///
    /// Returns an empty vector for an empty set with an offset reference.
    pub fn resolve(&self, points: &[Vec<f64>]) -> Vec<f64> {
        match self {
            HypervolumeReference::Point(point) => point.clone(),
            HypervolumeReference::Offset(offset) => {
                let Some(first) = points.first() else {
                    return Vec::new();
                };
                let mut worst = first.clone();
                for p in &points[1..] {
                    for (w, &v) in worst.iter_mut().zip(p) {
                        *w = w.max(v);
                    }
                }
                worst.iter().map(|w| w + offset).collect()
            }
        }
    }
}

/// Computes the hypervolume of `points` with respect to `reference`.
///
/// # Example
///
/// ```
/// use u_moea::pareto::hypervolume;
///
/// let front = vec![vec![1.0, 4.0], vec![2.0, 3.0], vec![4.0, 1.0]];
/// let hv = hypervolume(&front, &[5.0, 5.0]);
/// assert!((hv - 9.0).abs() < 1e-12);
/// ```
pub fn hypervolume(points: &[Vec<f64>], reference: &[f64]) -> f64 {
    let active: Vec<&[f64]> = points
        .iter()
        .map(Vec::as_slice)
        .filter(|p| strictly_dominates(p, reference))
        .collect();

    if active.is_empty() {
        return 0.0;
    }
    hv_sliced(&active, reference)
}

/// Computes the exclusive hypervolume contribution of every point.
///
/// `result[i] == hypervolume(points) - hypervolume(points without i)`, up to
/// floating-point rounding. Dominated points, duplicated points, and points
/// outside the reference box contribute `0.0`. All values are
/// non-negative.
///
/// # Example
///
/// ```
/// use u_moea::pareto::contributions;
///
/// let front = vec![vec![1.0, 4.0], vec![2.0, 3.0], vec![4.0, 1.0], vec![3.0, 3.0]];
/// let c = contributions(&front, &[5.0, 5.0]);
/// assert_eq!(c, vec![1.0, 1.0, 2.0, 0.0]);
/// ```
pub fn contributions(points: &[Vec<f64>], reference: &[f64]) -> Vec<f64> {
    let mut result = vec![0.0; points.len()];

    let (active_idx, active): (Vec<usize>, Vec<&[f64]>) = points
        .iter()
        .enumerate()
        .filter(|(_, p)| strictly_dominates(p, reference))
        .map(|(i, p)| (i, p.as_slice()))
        .unzip();

    if active.is_empty() {
        return result;
    }

    for (i, c) in active_idx.into_iter().zip(contrib_sliced(&active, reference)) {
        result[i] = c.max(0.0);
    }
    result
}

/// Computes the contribution of the point at `index` given the hypervolume
/// `hv` of the whole set, by recomputing the hypervolume without it.
///
/// Prefer [`contributions`] when every point's contribution is needed.
///
/// # Panics
/// Panics if `index` is out of range.
pub fn contribution(points: &[Vec<f64>], index: usize, hv: f64, reference: &[f64]) -> f64 {
    assert!(index < points.len(), "index {index} out of range");
    let rest: Vec<Vec<f64>> = points
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != index)
        .map(|(_, p)| p.clone())
        .collect();
    (hv - hypervolume(&rest, reference)).max(0.0)
}

/// Hypervolume computations bound to one reference policy.
///
/// The reference point is resolved once per population and shared by the
/// population's hypervolume and every member's contribution, so a
/// contribution can never be negative.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HypervolumeEngine {
    reference: HypervolumeReference,
}

impl HypervolumeEngine {
    pub fn new(reference: HypervolumeReference) -> Self {
        Self { reference }
    }

    /// Engine whose reference is the worst point of each set plus `offset`.
    pub fn with_offset(offset: f64) -> Self {
        Self::new(HypervolumeReference::Offset(offset))
    }

    pub fn reference(&self) -> &HypervolumeReference {
        &self.reference
    }

    /// Reference point this engine uses for `population`.
    pub fn reference_for<V>(&self, population: &Population<V>) -> Vec<f64> {
        self.reference.resolve(&population.objectives())
    }

    pub fn hypervolume<V>(&self, population: &Population<V>) -> f64 {
        let points = population.objectives();
        let reference = self.reference.resolve(&points);
        hypervolume(&points, &reference)
    }

    /// Writes each member's hypervolume contribution into its `crowding`
    /// annotation and returns the population's hypervolume.
    pub fn assign_contributions<V>(&self, population: &mut Population<V>) -> f64 {
        let points = population.objectives();
        let reference = self.reference.resolve(&points);
        let hv = hypervolume(&points, &reference);

        for (solution, c) in population
            .iter_mut()
            .zip(contributions(&points, &reference))
        {
            solution.set_crowding(c);
        }
        hv
    }
}

fn strictly_dominates(point: &[f64], reference: &[f64]) -> bool {
    point.len() == reference.len() && point.iter().zip(reference).all(|(&p, &r)| p < r)
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Indices of `points` sorted by their last coordinate (stable).
fn order_by_last(points: &[&[f64]], d: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| cmp_f64(points[a][d - 1], points[b][d - 1]));
    order
}

/// Hypervolume of points that all strictly dominate `reference`.
fn hv_sliced(points: &[&[f64]], reference: &[f64]) -> f64 {
    let d = reference.len();
    match d {
        0 => 0.0,
        1 => {
            let best = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
            (reference[0] - best).max(0.0)
        }
        2 => hv_2d(points, reference),
        _ => {
            let order = order_by_last(points, d);
            let sub_reference = &reference[..d - 1];
            let mut slice: Vec<&[f64]> = Vec::with_capacity(points.len());
            let mut volume = 0.0;

            for (k, &i) in order.iter().enumerate() {
                slice.push(&points[i][..d - 1]);
                let upper = order
                    .get(k + 1)
                    .map_or(reference[d - 1], |&j| points[j][d - 1]);
                let depth = upper - points[i][d - 1];
                if depth > 0.0 {
                    volume += depth * hv_sliced(&slice, sub_reference);
                }
            }
            volume
        }
    }
}

/// Two-objective hypervolume by sweeping the staircase in x order.
fn hv_2d(points: &[&[f64]], reference: &[f64]) -> f64 {
    let mut sorted: Vec<&[f64]> = points.to_vec();
    sorted.sort_by(|a, b| cmp_f64(a[0], b[0]).then_with(|| cmp_f64(a[1], b[1])));

    let mut area = 0.0;
    let mut ceiling = reference[1];
    for p in sorted {
        if p[1] < ceiling {
            area += (reference[0] - p[0]) * (ceiling - p[1]);
            ceiling = p[1];
        }
    }
    area
}

/// Contributions of points that all strictly dominate `reference`.
fn contrib_sliced(points: &[&[f64]], reference: &[f64]) -> Vec<f64> {
    let d = reference.len();
    match d {
        0 => vec![0.0; points.len()],
        1 => contrib_1d(points, reference[0]),
        2 => contrib_2d(points, reference),
        _ => {
            let order = order_by_last(points, d);
            let sub_reference = &reference[..d - 1];
            let mut result = vec![0.0; points.len()];
            let mut slice: Vec<&[f64]> = Vec::with_capacity(points.len());

            for (k, &i) in order.iter().enumerate() {
                slice.push(&points[i][..d - 1]);
                let upper = order
                    .get(k + 1)
                    .map_or(reference[d - 1], |&j| points[j][d - 1]);
                let depth = upper - points[i][d - 1];
                if depth > 0.0 {
                    let partial = contrib_sliced(&slice, sub_reference);
                    for (&member, c) in order[..=k].iter().zip(partial) {
                        result[member] += depth * c;
                    }
                }
            }
            result
        }
    }
}

fn contrib_1d(points: &[&[f64]], reference: f64) -> Vec<f64> {
    let mut result = vec![0.0; points.len()];
    let mut best = 0;
    for (i, p) in points.iter().enumerate() {
        if p[0] < points[best][0] {
            best = i;
        }
    }
    let runner_up = points
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != best)
        .map(|(_, p)| p[0])
        .fold(reference, f64::min);
    result[best] = (runner_up - points[best][0]).max(0.0);
    result
}

/// Exact two-objective contributions.
///
/// Each staircase point owns the rectangle between it, its staircase
/// neighbours and the reference. Non-staircase points falling inside that
/// rectangle are covered only by that staircase point, so the part of the
/// rectangle they cover is not exclusive to it.
fn contrib_2d(points: &[&[f64]], reference: &[f64]) -> Vec<f64> {
    let n = points.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        cmp_f64(points[a][0], points[b][0]).then_with(|| cmp_f64(points[a][1], points[b][1]))
    });

    let mut stairs: Vec<usize> = Vec::new();
    let mut on_stairs = vec![false; n];
    let mut ceiling = f64::INFINITY;
    for &i in &order {
        if points[i][1] < ceiling {
            stairs.push(i);
            on_stairs[i] = true;
            ceiling = points[i][1];
        }
    }

    let upper_y = |s: usize| {
        if s == 0 {
            reference[1]
        } else {
            points[stairs[s - 1]][1]
        }
    };
    let upper_x = |s: usize| {
        stairs
            .get(s + 1)
            .map_or(reference[0], |&next| points[next][0])
    };

    let mut inner: Vec<Vec<&[f64]>> = vec![Vec::new(); stairs.len()];
    for &i in order.iter().filter(|&&i| !on_stairs[i]) {
        let p = points[i];
        // The first point in x order is always on the staircase.
        let s = stairs.partition_point(|&q| points[q][0] <= p[0]) - 1;
        if p[1] < upper_y(s) {
            inner[s].push(p);
        }
    }

    let mut result = vec![0.0; n];
    for (s, &q) in stairs.iter().enumerate() {
        let corner = [upper_x(s), upper_y(s)];
        let area = (corner[0] - points[q][0]) * (corner[1] - points[q][1]);
        let covered = if inner[s].is_empty() {
            0.0
        } else {
            hv_2d(&inner[s], &corner)
        };
        result[q] = (area - covered).max(0.0);
    }
    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solution::Solution;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    // ---- Hypervolume ----

    #[test]
    fn test_empty_set() {
        assert_eq!(hypervolume(&[], &[1.0, 1.0]), 0.0);
        assert!(contributions(&[], &[1.0, 1.0]).is_empty());
    }

    #[test]
    fn test_single_point_is_box() {
        assert!(close(hypervolume(&[vec![1.0, 2.0]], &[3.0, 5.0]), 6.0));
        assert!(close(hypervolume(&[vec![1.0, 1.0, 1.0]], &[2.0, 3.0, 4.0]), 6.0));
    }

    #[test]
    fn test_one_objective() {
        let hv = hypervolume(&[vec![3.0], vec![1.0], vec![2.0]], &[5.0]);
        assert!(close(hv, 4.0));
        let c = contributions(&[vec![3.0], vec![1.0], vec![2.0]], &[5.0]);
        assert_eq!(c, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_two_objectives_staircase() {
        let front = vec![vec![1.0, 4.0], vec![2.0, 3.0], vec![4.0, 1.0]];
        assert!(close(hypervolume(&front, &[5.0, 5.0]), 9.0));
    }

    #[test]
    fn test_points_outside_reference_ignored() {
        let front = vec![vec![1.0, 1.0], vec![6.0, 0.0], vec![2.0, 2.0]];
        assert!(close(hypervolume(&front, &[3.0, 3.0]), 4.0));
        let c = contributions(&front, &[3.0, 3.0]);
        assert_eq!(c[1], 0.0);
    }

    #[test]
    fn test_three_objectives_overlap() {
        // boxes of 4 and 2 with a unit-cube overlap
        let points = vec![vec![1.0, 1.0, 2.0], vec![2.0, 2.0, 1.0]];
        let reference = [3.0, 3.0, 3.0];
        assert!(close(hypervolume(&points, &reference), 5.0));
        let c = contributions(&points, &reference);
        assert!(close(c[0], 3.0), "got {}", c[0]);
        assert!(close(c[1], 1.0), "got {}", c[1]);
    }

    // ---- Contributions ----

    #[test]
    fn test_contributions_staircase() {
        let front = vec![vec![1.0, 4.0], vec![2.0, 3.0], vec![4.0, 1.0]];
        let reference = [5.0, 5.0];
        let c = contributions(&front, &reference);
        assert_eq!(c, vec![1.0, 2.0, 2.0]);

        let hv = hypervolume(&front, &reference);
        for (i, &ci) in c.iter().enumerate() {
            assert!(close(ci, contribution(&front, i, hv, &reference)));
        }
    }

    #[test]
    fn test_point_covered_only_by_one_other() {
        let points = vec![vec![1.0, 1.0], vec![2.0, 2.0]];
        let c = contributions(&points, &[3.0, 3.0]);
        assert_eq!(c, vec![3.0, 0.0]);
    }

    #[test]
    fn test_duplicates_contribute_nothing() {
        let points = vec![vec![1.0, 2.0], vec![1.0, 2.0], vec![2.0, 1.0]];
        let c = contributions(&points, &[3.0, 3.0]);
        assert_eq!(c[0], 0.0);
        assert_eq!(c[1], 0.0);
        assert!(c[2] > 0.0);
    }

    #[test]
    fn test_weakly_dominated_limits_neighbour() {
        // (3,2) shares y with (1,2) and cuts its exclusive strip short
        let points = vec![vec![1.0, 2.0], vec![3.0, 2.0], vec![4.0, 1.0]];
        let reference = [5.0, 5.0];
        let hv = hypervolume(&points, &reference);
        let c = contributions(&points, &reference);
        for (i, &ci) in c.iter().enumerate() {
            let naive = contribution(&points, i, hv, &reference);
            assert!(close(ci, naive), "point {i}: {ci} vs {naive}");
        }
    }

    // ---- Reference resolution ----

    #[test]
    fn test_offset_reference() {
        let points = vec![vec![1.0, 4.0], vec![3.0, 2.0]];
        let r = HypervolumeReference::Offset(1.0).resolve(&points);
        assert_eq!(r, vec![4.0, 5.0]);
        assert!(HypervolumeReference::Offset(1.0).resolve(&[]).is_empty());
        let fixed = HypervolumeReference::Point(vec![9.0, 9.0]).resolve(&points);
        assert_eq!(fixed, vec![9.0, 9.0]);
    }

    #[test]
    fn test_engine_assigns_contributions() {
        let mut population: Population<usize> = [[1.0, 4.0], [2.0, 3.0], [4.0, 1.0]]
            .iter()
            .enumerate()
            .map(|(i, o)| Solution::with_objectives(i, o.to_vec()))
            .collect();
        let engine = HypervolumeEngine::new(HypervolumeReference::Point(vec![5.0, 5.0]));
        let hv = engine.assign_contributions(&mut population);
        assert!(close(hv, 9.0));
        assert!(close(engine.hypervolume(&population), 9.0));
        let c: Vec<f64> = population.iter().map(|s| s.crowding()).collect();
        assert_eq!(c, vec![1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_engine_zero_offset_excludes_extremes() {
        let mut population: Population<()> = [[1.0, 4.0], [2.0, 3.0], [4.0, 1.0]]
            .iter()
            .map(|o| Solution::with_objectives((), o.to_vec()))
            .collect();
        let engine = HypervolumeEngine::with_offset(0.0);
        assert_eq!(engine.reference_for(&population), vec![4.0, 4.0]);
        let hv = engine.assign_contributions(&mut population);
        // only (2,3) strictly dominates (4,4)
        assert!(close(hv, 2.0));
        assert_eq!(population[0].crowding(), 0.0);
        assert!(close(population[1].crowding(), 2.0));
    }

    // ---- Properties ----

    fn point_sets() -> impl Strategy<Value = (usize, Vec<Vec<f64>>)> {
        (1usize..5).prop_flat_map(|d| {
            (
                Just(d),
                prop::collection::vec(
                    prop::collection::vec((0u8..8).prop_map(f64::from), d),
                    0..12,
                ),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_shared_pass_matches_naive((d, points) in point_sets()) {
            let reference = vec![8.5; d];
            let hv = hypervolume(&points, &reference);
            let shared = contributions(&points, &reference);
            prop_assert_eq!(shared.len(), points.len());
            for (i, &c) in shared.iter().enumerate() {
                prop_assert!(c >= 0.0);
                let naive = contribution(&points, i, hv, &reference);
                prop_assert!(close(c, naive), "point {}: shared {} vs naive {}", i, c, naive);
            }
        }

        #[test]
        fn prop_dropping_least_contributor_never_increases_hv((d, points) in point_sets()) {
            prop_assume!(!points.is_empty());
            let reference = vec![8.5; d];
            let hv = hypervolume(&points, &reference);
            let shared = contributions(&points, &reference);
            let worst = shared
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.total_cmp(b.1))
                .map(|(i, _)| i)
                .unwrap();
            let mut rest = points.clone();
            rest.remove(worst);
            let after = hypervolume(&rest, &reference);
            prop_assert!(after <= hv + 1e-9);
            prop_assert!(close(hv - after, shared[worst]));
        }
    }
}
