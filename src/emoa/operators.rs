//! Variation operator contracts.
//!
//! Concrete crossover and mutation operators are problem-specific and
//! supplied by the caller. Selection may hand back either one solution or
//! a small batch per call; [`Selected`] makes the two cases explicit.

use crate::error::MoeaError;
use crate::solution::{Population, Solution};
use rand::Rng;

/// Upper bound on selection calls spent collecting one pair of parents.
pub const MAX_SELECTION_ATTEMPTS: usize = 16;

/// Result of one selection call.
#[derive(Debug, Clone, PartialEq)]
pub enum Selected<V> {
    /// A single parent.
    One(Solution<V>),
    /// Several parents at once, e.g. a mating pair.
    Many(Vec<Solution<V>>),
}

impl<V> Selected<V> {
    pub fn len(&self) -> usize {
        match self {
            Selected::One(_) => 1,
            Selected::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<Solution<V>> {
        match self {
            Selected::One(s) => vec![s],
            Selected::Many(v) => v,
        }
    }
}

/// Chooses parents from a population, with replacement.
pub trait SelectionOperator<V> {
    fn select<R: Rng>(&self, population: &Population<V>, rng: &mut R) -> Selected<V>;
}

/// Recombines two parents into exactly two offspring.
pub trait CrossoverOperator<V> {
    fn cross<R: Rng>(&self, parents: &[Solution<V>; 2], rng: &mut R) -> Vec<Solution<V>>;
}

/// Perturbs a solution's decision variables in place.
pub trait MutationOperator<V> {
    fn mutate<R: Rng>(&self, solution: &mut Solution<V>, rng: &mut R);
}

/// Calls `selection` until exactly two parents are held.
///
/// Overshooting two parents, or not reaching two within
/// [`MAX_SELECTION_ATTEMPTS`] calls, breaks the selection contract.
pub fn collect_parents<V, S, R>(
    selection: &S,
    population: &Population<V>,
    rng: &mut R,
) -> Result<[Solution<V>; 2], MoeaError>
where
    S: SelectionOperator<V>,
    R: Rng,
{
    let mut parents: Vec<Solution<V>> = Vec::with_capacity(2);

    for _ in 0..MAX_SELECTION_ATTEMPTS {
        parents.extend(selection.select(population, rng).into_vec());
        if parents.len() >= 2 {
            break;
        }
    }

    let count = parents.len();
    <[Solution<V>; 2]>::try_from(parents).map_err(|_| {
        MoeaError::contract(
            "selection",
            format!("expected exactly 2 parents, collected {count}"),
        )
    })
}

/// Applies `crossover` and checks that it produced two offspring.
pub fn recombine<V, C, R>(
    crossover: &C,
    parents: &[Solution<V>; 2],
    rng: &mut R,
) -> Result<[Solution<V>; 2], MoeaError>
where
    C: CrossoverOperator<V>,
    R: Rng,
{
    let children = crossover.cross(parents, rng);
    let count = children.len();
    <[Solution<V>; 2]>::try_from(children).map_err(|_| {
        MoeaError::contract("crossover", format!("expected 2 offspring, got {count}"))
    })
}
