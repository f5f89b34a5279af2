//! Core trait and value definitions shared by every algorithm.
//!
//! [`Solution`] is the unit the ranking, diversity and hypervolume
//! machinery operates on; [`Problem`] is the contract between the generic
//! engine and a domain-specific problem.

use crate::error::EvaluationError;
use rand::Rng;

/// A candidate solution: decision variables plus everything the engine
/// derives from them.
///
/// The decision variables are opaque to the engine. Objectives are
/// **minimized**. The `rank` and `crowding` annotations are overwritten
/// every time a ranking, crowding or contribution pass runs over a
/// population containing the solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution<V> {
    variables: V,
    objectives: Vec<f64>,
    constraint_violation: f64,
    violated_constraints: usize,
    rank: usize,
    crowding: f64,
}

impl<V> Solution<V> {
    /// Creates an unevaluated solution with `number_of_objectives` zeroed
    /// objective values.
    pub fn new(variables: V, number_of_objectives: usize) -> Self {
        Self {
            variables,
            objectives: vec![0.0; number_of_objectives],
            constraint_violation: 0.0,
            violated_constraints: 0,
            rank: 0,
            crowding: 0.0,
        }
    }

    /// Creates a solution with known objective values. Mostly useful in
    /// tests and when importing fronts computed elsewhere.
    pub fn with_objectives(variables: V, objectives: Vec<f64>) -> Self {
        Self {
            objectives,
            ..Self::new(variables, 0)
        }
    }

    pub fn variables(&self) -> &V {
        &self.variables
    }

    pub fn variables_mut(&mut self) -> &mut V {
        &mut self.variables
    }

    pub fn into_variables(self) -> V {
        self.variables
    }

    pub fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    /// Value of one objective.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn objective(&self, index: usize) -> f64 {
        self.objectives[index]
    }

    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }

    /// Sets one objective value.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn set_objective(&mut self, index: usize, value: f64) {
        self.objectives[index] = value;
    }

    pub fn set_objectives(&mut self, objectives: Vec<f64>) {
        self.objectives = objectives;
    }

    /// Overall constraint violation degree; `0.0` means feasible.
    pub fn constraint_violation(&self) -> f64 {
        self.constraint_violation
    }

    /// Sets the violation degree. Negative values are stored as their
    /// magnitude so the degree is always non-negative.
    pub fn set_constraint_violation(&mut self, degree: f64) {
        self.constraint_violation = degree.abs();
    }

    pub fn violated_constraints(&self) -> usize {
        self.violated_constraints
    }

    pub fn set_violated_constraints(&mut self, count: usize) {
        self.violated_constraints = count;
    }

    pub fn is_feasible(&self) -> bool {
        self.constraint_violation == 0.0
    }

    /// Front index assigned by the last ranking pass.
    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn set_rank(&mut self, rank: usize) {
        self.rank = rank;
    }

    /// Crowding distance (or hypervolume contribution) assigned by the last
    /// diversity pass. May be `f64::INFINITY`.
    pub fn crowding(&self) -> f64 {
        self.crowding
    }

    pub fn set_crowding(&mut self, crowding: f64) {
        self.crowding = crowding;
    }
}

/// Defines a multi-objective optimization problem.
///
/// Implementations must be deterministic given the decision variables,
/// and `Send + Sync` because evaluators may score solutions from several
/// threads.
///
/// # Implementing
///
/// ```
/// use rand::Rng;
/// use u_moea::error::EvaluationError;
/// use u_moea::solution::{Problem, Solution};
///
/// struct Schaffer;
///
/// impl Problem for Schaffer {
///     type Variables = f64;
///
///     fn number_of_variables(&self) -> usize { 1 }
///     fn number_of_objectives(&self) -> usize { 2 }
///
///     fn create_variables<R: Rng>(&self, rng: &mut R) -> f64 {
///         rng.random_range(-10.0..10.0)
///     }
///
///     fn evaluate(&self, s: &mut Solution<f64>) -> Result<(), EvaluationError> {
///         let x = *s.variables();
///         s.set_objectives(vec![x * x, (x - 2.0) * (x - 2.0)]);
///         Ok(())
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// Decision variable representation.
    type Variables: Clone + Send + Sync + std::fmt::Debug;

    fn number_of_variables(&self) -> usize;

    fn number_of_objectives(&self) -> usize;

    fn number_of_constraints(&self) -> usize {
        0
    }

    /// Creates the decision variables of a fresh solution.
    fn create_variables<R: Rng>(&self, rng: &mut R) -> Self::Variables;

    /// Fills the objective vector of `solution`.
    fn evaluate(&self, solution: &mut Solution<Self::Variables>) -> Result<(), EvaluationError>;

    /// Fills the constraint violation of `solution`.
    ///
    /// The default implementation leaves the solution feasible.
    fn evaluate_constraints(
        &self,
        _solution: &mut Solution<Self::Variables>,
    ) -> Result<(), EvaluationError> {
        Ok(())
    }

    /// Creates an unevaluated solution sized for this problem.
    fn create_solution<R: Rng>(&self, rng: &mut R) -> Solution<Self::Variables> {
        Solution::new(self.create_variables(rng), self.number_of_objectives())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_solution_is_blank() {
        let s = Solution::new(vec![0.5, 0.25], 3);
        assert_eq!(s.objectives(), &[0.0, 0.0, 0.0]);
        assert_eq!(s.number_of_objectives(), 3);
        assert!(s.is_feasible());
        assert_eq!(s.rank(), 0);
        assert_eq!(s.crowding(), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_objective_out_of_range_panics() {
        let s = Solution::with_objectives((), vec![1.0, 2.0]);
        s.objective(2);
    }

    #[test]
    fn test_violation_is_non_negative() {
        let mut s = Solution::new((), 2);
        s.set_constraint_violation(-1.5);
        assert_eq!(s.constraint_violation(), 1.5);
        assert!(!s.is_feasible());
    }

    #[test]
    fn test_annotations_overwrite() {
        let mut s = Solution::with_objectives((), vec![1.0, 2.0]);
        s.set_rank(3);
        s.set_crowding(f64::INFINITY);
        s.set_rank(1);
        s.set_crowding(0.5);
        assert_eq!(s.rank(), 1);
        assert_eq!(s.crowding(), 0.5);
        assert_eq!(s.objective(1), 2.0);
    }
}
