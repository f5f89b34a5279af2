//! Batch evaluation of populations.
//!
//! An [`Evaluator`] fills objectives and constraint violations for every
//! solution of a population and only returns once the whole batch is
//! done. [`ParallelEvaluator`] (feature `parallel`) spreads the batch over
//! a dedicated rayon thread pool; it never touches anything but the
//! solutions it is handed.

use crate::error::MoeaError;
use crate::solution::{Population, Problem, Solution};

/// Evaluates whole populations against a problem.
pub trait Evaluator {
    /// Evaluates every solution of `population` (objectives, then
    /// constraints). The first failure aborts the batch.
    fn evaluate<P: Problem>(
        &self,
        population: &mut Population<P::Variables>,
        problem: &P,
    ) -> Result<(), MoeaError>;

    /// Releases the evaluator's resources. Calling it again is a no-op.
    fn shutdown(&mut self);
}

/// Evaluates one solution: objectives first, then constraints.
///
/// The constraint fields are cleared first so offspring never inherit a
/// parent's violation. A problem that fills a different number of
/// objectives than it declares breaks its contract.
pub fn evaluate_solution<P: Problem>(
    problem: &P,
    solution: &mut Solution<P::Variables>,
) -> Result<(), MoeaError> {
    solution.set_constraint_violation(0.0);
    solution.set_violated_constraints(0);
    problem.evaluate(solution)?;

    let expected = problem.number_of_objectives();
    if solution.number_of_objectives() != expected {
        return Err(MoeaError::contract(
            "problem",
            format!(
                "declared {expected} objectives, evaluation produced {}",
                solution.number_of_objectives()
            ),
        ));
    }

    problem.evaluate_constraints(solution)?;
    Ok(())
}

/// Evaluates solutions one after another on the calling thread.
#[derive(Debug, Default)]
pub struct SequentialEvaluator {
    shut_down: bool,
}

impl SequentialEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Evaluator for SequentialEvaluator {
    fn evaluate<P: Problem>(
        &self,
        population: &mut Population<P::Variables>,
        problem: &P,
    ) -> Result<(), MoeaError> {
        if self.shut_down {
            return Err(MoeaError::EvaluatorShutdown);
        }
        for solution in population.iter_mut() {
            evaluate_solution(problem, solution)?;
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

#[cfg(feature = "parallel")]
pub use parallel::ParallelEvaluator;

#[cfg(feature = "parallel")]
mod parallel {
    use super::{evaluate_solution, Evaluator};
    use crate::error::MoeaError;
    use crate::solution::{Population, Problem};
    use rayon::prelude::*;

    /// Evaluates solutions on a dedicated rayon thread pool.
    ///
    /// The pool is dropped by [`Evaluator::shutdown`]; evaluating afterwards
    /// fails with [`MoeaError::EvaluatorShutdown`].
    #[derive(Debug)]
    pub struct ParallelEvaluator {
        pool: Option<rayon::ThreadPool>,
    }

    impl ParallelEvaluator {
        /// Creates an evaluator with `threads` workers (`0` = one per core).
        pub fn new(threads: usize) -> Result<Self, MoeaError> {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("moea-eval-{i}"))
                .build()
                .map_err(|e| MoeaError::ThreadPool(e.to_string()))?;
            Ok(Self { pool: Some(pool) })
        }

        pub fn threads(&self) -> usize {
            self.pool
                .as_ref()
                .map_or(0, rayon::ThreadPool::current_num_threads)
        }
    }

    impl Evaluator for ParallelEvaluator {
        fn evaluate<P: Problem>(
            &self,
            population: &mut Population<P::Variables>,
            problem: &P,
        ) -> Result<(), MoeaError> {
            let pool = self.pool.as_ref().ok_or(MoeaError::EvaluatorShutdown)?;
            pool.install(|| {
                population
                    .as_mut_slice()
                    .par_iter_mut()
                    .try_for_each(|solution| evaluate_solution(problem, solution))
            })
        }

        fn shutdown(&mut self) {
            if self.pool.take().is_some() {
                tracing::debug!("parallel evaluator thread pool released");
            }
        }
    }
}
