//! Multi-objective evolutionary algorithm templates.
//!
//! A generic, domain-agnostic framework for evolving a population toward
//! the Pareto front of a [`Problem`](crate::solution::Problem). Users
//! supply the problem and the variation operators; the framework owns
//! evaluation, survivor selection and bookkeeping.
//!
//! # Core Traits
//!
//! - [`SelectionOperator`], [`CrossoverOperator`], [`MutationOperator`]:
//!   variation operator contracts
//! - [`Evaluator`]: batch evaluation of a population
//!
//! # Key Types
//!
//! - [`MoeaConfig`]: Algorithm parameters (population size, budget, replacement, presets)
//! - [`MoeaBuilder`]: Validated assembly of problem, operators and evaluator
//! - [`Moea`]: Executes the evolutionary loop
//! - [`MoeaResult`]: Final front, population, archive and statistics
//!
//! # Replacement Strategies
//!
//! - [`Replacement::Generational`]: elitist rank + crowding truncation (NSGA-II)
//! - [`Replacement::SteadyState`]: drop the least hypervolume contributor (SMS-EMOA)
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Beume, Naujoks & Emmerich (2007), *SMS-EMOA: Multiobjective selection
//!   based on dominated hypervolume*
//! - Deb & Sundar (2006), *Reference point based multi-objective optimization
//!   using evolutionary algorithms*

mod builder;
mod config;
mod evaluator;
mod operators;
mod runner;
mod selection;

pub use builder::MoeaBuilder;
pub use config::{MoeaConfig, Replacement};
#[cfg(feature = "parallel")]
pub use evaluator::ParallelEvaluator;
pub use evaluator::{evaluate_solution, Evaluator, SequentialEvaluator};
pub use operators::{
    collect_parents, recombine, CrossoverOperator, MutationOperator, Selected,
    SelectionOperator, MAX_SELECTION_ATTEMPTS,
};
pub use runner::{elitist_selection, hypervolume_replacement, Moea, MoeaResult};
pub use selection::Selection;
