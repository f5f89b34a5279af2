//! Built-in selection strategies.
//!
//! Selection determines which individuals are chosen as parents for
//! crossover. The tournament uses the crowded comparison of NSGA-II:
//! lower front rank wins, larger crowding distance breaks ties.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"

use super::operators::{Selected, SelectionOperator};
use crate::pareto::crowded_comparison;
use crate::solution::Population;
use rand::Rng;
use std::cmp::Ordering;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_moea::emoa::Selection;
///
/// // Binary tournament (the NSGA-II default)
/// let sel = Selection::Tournament(2);
///
/// // Uniform random parent
/// let sel = Selection::Random;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Crowded tournament: pick `k` individuals at random, keep the best.
    ///
    /// Higher `k` = stronger selection pressure. `k = 2` is the classic
    /// binary tournament.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Uniform random choice.
    Random,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(2)
    }
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select_index<V, R: Rng>(&self, population: &Population<V>, rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Random => rng.random_range(0..population.len()),
        }
    }
}

impl<V: Clone> SelectionOperator<V> for Selection {
    fn select<R: Rng>(&self, population: &Population<V>, rng: &mut R) -> Selected<V> {
        let idx = self.select_index(population, rng);
        Selected::One(population[idx].clone())
    }
}

/// Tournament selection: pick k random individuals, return best.
fn tournament<V, R: Rng>(population: &Population<V>, k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if crowded_comparison(&population[idx], &population[best_idx]) == Ordering::Less {
            best_idx = idx;
        }
    }
    best_idx
}
