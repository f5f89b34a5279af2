//! Domain-agnostic multi-objective evolutionary optimization.
//!
//! Evolves a population of candidate solutions toward the Pareto-optimal
//! trade-off surface of several conflicting objectives:
//!
//! - **Solution model**: decision variables, objective vector, constraint
//!   violation and the rank/crowding annotations used by selection.
//! - **Pareto toolkit**: constrained dominance, fast non-dominated
//!   sorting, crowding distance, hypervolume with per-point
//!   contributions, and reference-point archives.
//! - **Algorithm templates**: generational elitist replacement (NSGA-II)
//!   and steady-state hypervolume replacement (SMS-EMOA), with pluggable
//!   selection, crossover, mutation and evaluation.
//!
//! # Architecture
//!
//! This crate sits at Layer 2 (Algorithms) in the U-Engine ecosystem. It
//! contains no concrete problems or variation operators; consumers at
//! higher layers define their problem by implementing
//! [`Problem`](solution::Problem) and bring operators suited to its
//! encoding.

pub mod emoa;
pub mod error;
pub mod pareto;
pub mod solution;
