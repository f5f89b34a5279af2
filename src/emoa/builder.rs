//! Validated construction of a runnable algorithm.

use super::config::MoeaConfig;
use super::evaluator::Evaluator;
use super::operators::{CrossoverOperator, MutationOperator, SelectionOperator};
use super::runner::Moea;
use crate::error::ConfigError;
use crate::solution::Problem;

/// Collects the problem, configuration, operators and evaluator of a run.
///
/// [`build`](MoeaBuilder::build) validates everything at once; a missing
/// collaborator or an invalid parameter yields a [`ConfigError`] and no
/// algorithm instance.
///
/// ```ignore
/// let moea = MoeaBuilder::new(problem)
///     .config(MoeaConfig::default().with_seed(42))
///     .selection(Selection::Tournament(2))
///     .crossover(MyCrossover)
///     .mutation(MyMutation)
///     .evaluator(SequentialEvaluator::new())
///     .build()?;
/// let result = moea.run()?;
/// ```
pub struct MoeaBuilder<P, S, C, M, E> {
    problem: P,
    config: MoeaConfig,
    selection: Option<S>,
    crossover: Option<C>,
    mutation: Option<M>,
    evaluator: Option<E>,
}

impl<P, S, C, M, E> MoeaBuilder<P, S, C, M, E>
where
    P: Problem,
    S: SelectionOperator<P::Variables>,
    C: CrossoverOperator<P::Variables>,
    M: MutationOperator<P::Variables>,
    E: Evaluator,
{
    pub fn new(problem: P) -> Self {
        Self {
            problem,
            config: MoeaConfig::default(),
            selection: None,
            crossover: None,
            mutation: None,
            evaluator: None,
        }
    }

    pub fn config(mut self, config: MoeaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn selection(mut self, selection: S) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn crossover(mut self, crossover: C) -> Self {
        self.crossover = Some(crossover);
        self
    }

    pub fn mutation(mut self, mutation: M) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn evaluator(mut self, evaluator: E) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Validates the configuration and assembles the algorithm.
    pub fn build(self) -> Result<Moea<P, S, C, M, E>, ConfigError> {
        let selection = self.selection.ok_or(ConfigError::Missing("selection operator"))?;
        let crossover = self.crossover.ok_or(ConfigError::Missing("crossover operator"))?;
        let mutation = self.mutation.ok_or(ConfigError::Missing("mutation operator"))?;
        let evaluator = self.evaluator.ok_or(ConfigError::Missing("evaluator"))?;

        let objectives = self.problem.number_of_objectives();
        if objectives == 0 {
            return Err(ConfigError::ObjectiveCount(objectives));
        }
        self.config.validate_for(objectives)?;

        Ok(Moea::new(
            self.problem,
            self.config,
            selection,
            crossover,
            mutation,
            evaluator,
        ))
    }
}
