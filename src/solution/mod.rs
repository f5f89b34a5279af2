//! Solution and population model.
//!
//! - [`Solution`]: decision variables, objective vector, constraint
//!   violation, and the rank/crowding annotations
//! - [`Population`]: ordered collection with union and stable sorting
//! - [`Problem`]: the contract a domain problem implements

mod population;
mod types;

pub use population::Population;
pub use types::{Problem, Solution};
