//! Pareto toolkit shared by every algorithm template.
//!
//! # Submodules
//!
//! - [`ranking`]: constrained dominance, non-dominated sorting, crowding distance
//! - [`hypervolume`]: hypervolume indicator and per-point contributions
//! - [`archive`]: bounded reference-point archives

pub mod archive;
pub mod hypervolume;
pub mod ranking;

pub use archive::{ReferencePointArchive, ReferencePointArchives};
pub use hypervolume::{
    contribution, contributions, hypervolume, HypervolumeEngine, HypervolumeReference,
};
pub use ranking::{
    assign_crowding_distance, crowded_comparison, crowding_distance, dominance,
    non_dominated, non_dominated_sort, objective_dominance, rank, Dominance,
    NondominatedSortResult,
};
