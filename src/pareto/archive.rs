//! Reference-point archives.
//!
//! A [`ReferencePointArchive`] is a bounded solution store biased toward a
//! decision maker's reference point. Once full, a newcomer only gets in by
//! displacing the least-preferred entry, where preference combines
//! closeness to the reference point with crowding distance among the
//! archive's entries.
//!
//! Several reference points are handled by [`ReferencePointArchives`]: one
//! archive per point, the total capacity split evenly between them.

use super::ranking::crowding_distance;
use crate::solution::{Population, Solution};
use std::cmp::Ordering;

/// Capacity-bounded archive tied to one reference point.
#[derive(Debug, Clone)]
pub struct ReferencePointArchive<V> {
    reference_point: Vec<f64>,
    capacity: usize,
    members: Population<V>,
}

impl<V> ReferencePointArchive<V> {
    pub fn new(reference_point: Vec<f64>, capacity: usize) -> Self {
        Self {
            reference_point,
            members: Population::with_capacity(capacity),
            capacity,
        }
    }

    pub fn reference_point(&self) -> &[f64] {
        &self.reference_point
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &Population<V> {
        &self.members
    }

    pub fn into_members(self) -> Population<V> {
        self.members
    }

    /// Offers `solution` to the archive. Returns whether it was stored.
    ///
    /// Below capacity the solution is always stored. At capacity the
    /// least-preferred of the current members and the candidate is left
    /// out; if that is the candidate, nothing changes.
    pub fn add(&mut self, solution: Solution<V>) -> bool {
        if solution.number_of_objectives() != self.reference_point.len() {
            tracing::warn!(
                expected = self.reference_point.len(),
                actual = solution.number_of_objectives(),
                "solution does not match the archive's reference point dimension"
            );
            return false;
        }
        if self.capacity == 0 {
            return false;
        }
        if self.members.len() < self.capacity {
            self.members.push(solution);
            return true;
        }

        let candidate = self.members.len();
        let mut objectives = self.members.objectives();
        objectives.push(solution.objectives().to_vec());

        match least_preferred(&objectives, &self.reference_point) {
            worst if worst == candidate => false,
            worst => {
                self.members.remove(worst);
                self.members.push(solution);
                true
            }
        }
    }
}

/// Index of the least-preferred entry of `objectives`.
///
/// Each entry gets two ranks: by crowding distance (larger first) and by
/// Euclidean distance to `reference_point` (closer first). The entry with
/// the largest rank sum is least preferred; ties go to the entry farther
/// from the reference point, then to the later entry.
fn least_preferred(objectives: &[Vec<f64>], reference_point: &[f64]) -> usize {
    let n = objectives.len();
    let crowding = crowding_distance(objectives);
    let distance: Vec<f64> = objectives
        .iter()
        .map(|o| euclidean_distance(o, reference_point))
        .collect();

    let crowding_rank = ranks_by(n, |a, b| {
        crowding[b].partial_cmp(&crowding[a]).unwrap_or(Ordering::Equal)
    });
    let distance_rank = ranks_by(n, |a, b| {
        distance[a].partial_cmp(&distance[b]).unwrap_or(Ordering::Equal)
    });

    (0..n)
        .max_by(|&a, &b| {
            (crowding_rank[a] + distance_rank[a])
                .cmp(&(crowding_rank[b] + distance_rank[b]))
                .then_with(|| {
                    distance[a]
                        .partial_cmp(&distance[b])
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| a.cmp(&b))
        })
        .unwrap_or(0)
}

/// Position of each index after a stable sort with `compare`.
fn ranks_by<F>(n: usize, mut compare: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| compare(a, b));
    let mut ranks = vec![0; n];
    for (position, &i) in order.iter().enumerate() {
        ranks[i] = position;
    }
    ranks
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// One archive per reference point, sharing a total capacity.
#[derive(Debug, Clone)]
pub struct ReferencePointArchives<V> {
    archives: Vec<ReferencePointArchive<V>>,
}

impl<V: Clone> ReferencePointArchives<V> {
    /// Builds one archive per reference point, each with capacity
    /// `total_capacity / reference_points.len()`.
    pub fn new(reference_points: &[Vec<f64>], total_capacity: usize) -> Self {
        let per_archive = total_capacity
            .checked_div(reference_points.len())
            .unwrap_or(0);
        Self {
            archives: reference_points
                .iter()
                .map(|p| ReferencePointArchive::new(p.clone(), per_archive))
                .collect(),
        }
    }

    /// Offers a copy of `solution` to every archive. Returns how many
    /// archives stored it.
    pub fn offer(&mut self, solution: &Solution<V>) -> usize {
        self.archives
            .iter_mut()
            .map(|archive| archive.add(solution.clone()))
            .filter(|&accepted| accepted)
            .count()
    }

    /// Offers every member of `population`.
    pub fn offer_all(&mut self, population: &Population<V>) -> usize {
        population.iter().map(|s| self.offer(s)).sum()
    }

    pub fn archives(&self) -> &[ReferencePointArchive<V>] {
        &self.archives
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Total number of stored solutions across all archives.
    pub fn len(&self) -> usize {
        self.archives.iter().map(ReferencePointArchive::len).sum()
    }

    /// Concatenation of every archive's members, in archive order.
    pub fn solutions(&self) -> Population<V> {
        self.archives
            .iter()
            .flat_map(|a| a.members().iter().cloned())
            .collect()
    }
}
