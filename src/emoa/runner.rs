//! Evolutionary loop execution.
//!
//! [`Moea`] drives one run: initialization → (variation → evaluation →
//! replacement)* → result. The replacement strategy picked in
//! [`MoeaConfig::replacement`] decides which survivors are kept:
//!
//! - [`Replacement::Generational`]: [`elitist_selection`] over the union of
//!   parents and a full offspring population (NSGA-II)
//! - [`Replacement::SteadyState`]: [`hypervolume_replacement`] after every
//!   single offspring (SMS-EMOA)
//!
//! The run stops when the evaluation counter reaches `max_evaluations`
//! exactly. The evaluator is shut down exactly once when the run ends,
//! whether it succeeded or failed.

use super::builder::MoeaBuilder;
use super::config::{MoeaConfig, Replacement};
use super::evaluator::Evaluator;
use super::operators::{
    collect_parents, recombine, CrossoverOperator, MutationOperator, SelectionOperator,
};
use crate::error::MoeaError;
use crate::pareto::{
    assign_crowding_distance, non_dominated, rank, HypervolumeEngine, ReferencePointArchives,
};
use crate::solution::{Population, Problem};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

/// Result of a multi-objective run.
#[derive(Debug, Clone)]
pub struct MoeaResult<V> {
    /// Non-dominated solutions of the final population.
    pub front: Population<V>,

    /// The final population.
    pub population: Population<V>,

    /// Contents of the reference-point archives, when reference points
    /// were configured.
    pub archive: Option<Population<V>>,

    /// Hypervolume of `front` under the configured reference.
    pub hypervolume: f64,

    /// Total number of solution evaluations.
    pub evaluations: usize,

    /// Number of generations (generational) or single-offspring
    /// iterations (steady-state) executed.
    pub iterations: usize,
}

/// A configured multi-objective evolutionary algorithm.
///
/// Built through [`MoeaBuilder`]; consumed by [`run`](Moea::run).
pub struct Moea<P, S, C, M, E> {
    problem: P,
    config: MoeaConfig,
    selection: S,
    crossover: C,
    mutation: M,
    evaluator: E,
    engine: HypervolumeEngine,
}

/// Mutable state threaded through the loop.
struct RunState<V> {
    population: Population<V>,
    evaluations: usize,
    iterations: usize,
    archives: Option<ReferencePointArchives<V>>,
}

impl<P, S, C, M, E> Moea<P, S, C, M, E>
where
    P: Problem,
    S: SelectionOperator<P::Variables>,
    C: CrossoverOperator<P::Variables>,
    M: MutationOperator<P::Variables>,
    E: Evaluator,
{
    pub(crate) fn new(
        problem: P,
        config: MoeaConfig,
        selection: S,
        crossover: C,
        mutation: M,
        evaluator: E,
    ) -> Self {
        let engine = HypervolumeEngine::new(config.hypervolume_reference.clone());
        Self {
            problem,
            config,
            selection,
            crossover,
            mutation,
            evaluator,
            engine,
        }
    }

    /// Starts building an algorithm for `problem`.
    pub fn builder(problem: P) -> MoeaBuilder<P, S, C, M, E> {
        MoeaBuilder::new(problem)
    }

    pub fn config(&self) -> &MoeaConfig {
        &self.config
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Runs the algorithm to completion.
    ///
    /// Evaluation failures and operator contract violations abort the run;
    /// the evaluator is shut down in every case.
    #[instrument(level = "debug", skip_all)]
    pub fn run(mut self) -> Result<MoeaResult<P::Variables>, MoeaError> {
        info!(
            replacement = ?self.config.replacement,
            population_size = self.config.population_size,
            max_evaluations = self.config.max_evaluations,
            "starting run"
        );

        let outcome = self.execute();
        self.evaluator.shutdown();

        match &outcome {
            Ok(result) => info!(
                evaluations = result.evaluations,
                iterations = result.iterations,
                front = result.front.len(),
                hypervolume = result.hypervolume,
                "run finished"
            ),
            Err(e) => tracing::error!(error = %e, "run aborted"),
        }
        outcome
    }

    fn execute(&self) -> Result<MoeaResult<P::Variables>, MoeaError> {
        let mut rng = create_rng(self.config.seed);
        let mut state = self.initialize(&mut rng)?;

        while !self.stopping_condition(state.evaluations) {
            match self.config.replacement {
                Replacement::Generational => self.generational_step(&mut state, &mut rng)?,
                Replacement::SteadyState => self.steady_state_step(&mut state, &mut rng)?,
            }
            state.iterations += 1;
        }

        Ok(self.finish(state))
    }

    fn stopping_condition(&self, evaluations: usize) -> bool {
        evaluations == self.config.max_evaluations
    }

    fn initialize<R: Rng>(&self, rng: &mut R) -> Result<RunState<P::Variables>, MoeaError> {
        let n = self.config.population_size;
        let mut population: Population<P::Variables> =
            (0..n).map(|_| self.problem.create_solution(rng)).collect();
        self.evaluator.evaluate(&mut population, &self.problem)?;

        let mut archives = (!self.config.reference_points.is_empty()).then(|| {
            ReferencePointArchives::new(&self.config.reference_points, self.config.archive_size)
        });
        if let Some(archives) = archives.as_mut() {
            archives.offer_all(&population);
        }

        Ok(RunState {
            population,
            evaluations: n,
            iterations: 0,
            archives,
        })
    }

    fn generational_step<R: Rng>(
        &self,
        state: &mut RunState<P::Variables>,
        rng: &mut R,
    ) -> Result<(), MoeaError> {
        let n = self.config.population_size;

        let mut offspring = Population::with_capacity(n);
        while offspring.len() < n {
            let parents = collect_parents(&self.selection, &state.population, rng)?;
            for mut child in recombine(&self.crossover, &parents, rng)? {
                if offspring.len() == n {
                    break;
                }
                self.mutation.mutate(&mut child, rng);
                offspring.push(child);
            }
        }

        self.evaluator.evaluate(&mut offspring, &self.problem)?;
        state.evaluations += offspring.len();
        if let Some(archives) = state.archives.as_mut() {
            archives.offer_all(&offspring);
        }

        let union = std::mem::take(&mut state.population).union(offspring);
        state.population = elitist_selection(union, n, self.problem.number_of_objectives())?;

        debug!(
            generation = state.iterations + 1,
            evaluations = state.evaluations,
            front = state.population.iter().filter(|s| s.rank() == 0).count(),
            "generation complete"
        );
        Ok(())
    }

    fn steady_state_step<R: Rng>(
        &self,
        state: &mut RunState<P::Variables>,
        rng: &mut R,
    ) -> Result<(), MoeaError> {
        let n = self.config.population_size;

        let parents = collect_parents(&self.selection, &state.population, rng)?;
        let [mut child, _] = recombine(&self.crossover, &parents, rng)?;
        self.mutation.mutate(&mut child, rng);

        let mut offspring = Population::from(vec![child]);
        self.evaluator.evaluate(&mut offspring, &self.problem)?;
        state.evaluations += 1;
        if let Some(archives) = state.archives.as_mut() {
            archives.offer_all(&offspring);
        }

        let union = std::mem::take(&mut state.population).union(offspring);
        let (next, hv) = hypervolume_replacement(union, &self.engine);
        if next.len() != n {
            return Err(MoeaError::contract(
                "replacement",
                format!("population size drifted to {} (expected {n})", next.len()),
            ));
        }
        state.population = next;

        debug!(
            evaluations = state.evaluations,
            hypervolume = hv,
            "steady-state iteration complete"
        );
        Ok(())
    }

    fn finish(&self, state: RunState<P::Variables>) -> MoeaResult<P::Variables> {
        let front = non_dominated(state.population.clone());
        let hypervolume = self.engine.hypervolume(&front);

        MoeaResult {
            front,
            population: state.population,
            archive: state.archives.map(|a| a.solutions()),
            hypervolume,
            evaluations: state.evaluations,
            iterations: state.iterations,
        }
    }
}

/// Elitist survivor selection of NSGA-II.
///
/// Ranks `union` and copies whole fronts in rank order while they fit.
/// The first front that does not fit is sorted by crowding distance
/// (descending, stable) and only its most isolated members are kept, so
/// the result has exactly `population_size` members. Crowding distance is
/// assigned on every admitted front.
///
/// Fails if `union` holds fewer than `population_size` solutions.
pub fn elitist_selection<V>(
    union: Population<V>,
    population_size: usize,
    number_of_objectives: usize,
) -> Result<Population<V>, MoeaError> {
    let available = union.len();
    let mut next = Population::with_capacity(population_size);

    for mut front in rank(union) {
        let remaining = population_size - next.len();
        if remaining == 0 {
            break;
        }

        assign_crowding_distance(&mut front, number_of_objectives);
        if front.len() <= remaining {
            next.extend(front);
        } else {
            front.sort_by(|a, b| {
                b.crowding()
                    .partial_cmp(&a.crowding())
                    .unwrap_or(Ordering::Equal)
            });
            next.extend(front.into_iter().take(remaining));
        }
    }

    if next.len() != population_size {
        return Err(MoeaError::contract(
            "replacement",
            format!("union of {available} solutions cannot fill a population of {population_size}"),
        ));
    }
    Ok(next)
}

/// Steady-state survivor selection of SMS-EMOA.
///
/// Computes the union's hypervolume once and every member's contribution
/// in a single shared pass (stored in the `crowding` annotation), sorts
/// ascending by contribution with ties kept in union order, and drops the
/// first member. Returns the survivors and the union's hypervolume.
pub fn hypervolume_replacement<V>(
    mut union: Population<V>,
    engine: &HypervolumeEngine,
) -> (Population<V>, f64) {
    let hv = engine.assign_contributions(&mut union);
    union.sort_by(|a, b| {
        a.crowding()
            .partial_cmp(&b.crowding())
            .unwrap_or(Ordering::Equal)
    });
    if !union.is_empty() {
        union.remove(0);
    }
    (union, hv)
}

fn create_rng(seed: Option<u64>) -> StdRng {
    StdRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}

// ============================================================================
// Tests
// ============================================================================
