//! Multi-objective algorithm configuration.
//!
//! [`MoeaConfig`] holds every numeric parameter of a run; the operators and
//! the evaluator are supplied through [`MoeaBuilder`](super::MoeaBuilder).

use crate::error::ConfigError;
use crate::pareto::HypervolumeReference;

/// Population replacement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// Elitist generational replacement (NSGA-II): a full offspring
    /// population per generation, survivors chosen by front rank and
    /// crowding distance.
    #[default]
    Generational,

    /// Steady-state replacement (SMS-EMOA): one offspring per iteration,
    /// the member with the smallest hypervolume contribution is dropped.
    SteadyState,
}

impl Replacement {
    /// Evaluations consumed by one iteration of this strategy.
    pub fn evaluations_per_iteration(self, population_size: usize) -> usize {
        match self {
            Replacement::Generational => population_size,
            Replacement::SteadyState => 1,
        }
    }
}

/// Configuration for a multi-objective evolutionary run.
///
/// # Defaults
///
/// ```
/// use u_moea::emoa::{MoeaConfig, Replacement};
///
/// let config = MoeaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_evaluations, 25_000);
/// assert_eq!(config.replacement, Replacement::Generational);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_moea::emoa::{MoeaConfig, Replacement};
///
/// let config = MoeaConfig::default()
///     .with_population_size(50)
///     .with_max_evaluations(5_000)
///     .with_replacement(Replacement::SteadyState)
///     .with_hypervolume_offset(1.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoeaConfig {
    /// Number of solutions in the population.
    pub population_size: usize,

    /// Total number of solution evaluations, initial population included.
    ///
    /// The run stops when the counter reaches exactly this value. For
    /// [`Replacement::Generational`] it must be a multiple of
    /// `population_size`.
    pub max_evaluations: usize,

    /// Replacement strategy.
    pub replacement: Replacement,

    /// Reference used for hypervolume contributions and the final front's
    /// hypervolume.
    pub hypervolume_reference: HypervolumeReference,

    /// Decision-maker reference points, one value per objective.
    ///
    /// When non-empty, every evaluated solution is offered to one archive
    /// per point.
    pub reference_points: Vec<Vec<f64>>,

    /// Total archive capacity, split evenly across `reference_points`.
    pub archive_size: usize,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for MoeaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_evaluations: 25_000,
            replacement: Replacement::Generational,
            hypervolume_reference: HypervolumeReference::default(),
            reference_points: Vec::new(),
            archive_size: 100,
            seed: None,
        }
    }
}

impl MoeaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the evaluation budget.
    pub fn with_max_evaluations(mut self, n: usize) -> Self {
        self.max_evaluations = n;
        self
    }

    /// Sets the evaluation budget from a number of generations:
    /// the initial population plus `generations` offspring populations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.max_evaluations = self.population_size * (generations + 1);
        self
    }

    /// Sets the replacement strategy.
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    /// Uses the worst observed point plus `offset` as hypervolume reference.
    pub fn with_hypervolume_offset(mut self, offset: f64) -> Self {
        self.hypervolume_reference = HypervolumeReference::Offset(offset);
        self
    }

    /// Uses a fixed hypervolume reference point.
    pub fn with_hypervolume_reference_point(mut self, point: Vec<f64>) -> Self {
        self.hypervolume_reference = HypervolumeReference::Point(point);
        self
    }

    /// Sets the reference points and the total archive capacity.
    pub fn with_reference_points(mut self, points: Vec<Vec<f64>>, archive_size: usize) -> Self {
        self.reference_points = points;
        self.archive_size = archive_size;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for fast runs: population 40, 4,000 evaluations.
    pub fn fast() -> Self {
        Self {
            population_size: 40,
            max_evaluations: 4_000,
            ..Self::default()
        }
    }

    /// Preset for balanced runs: population 100, 25,000 evaluations.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Preset for quality runs: population 200, 100,000 evaluations.
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            max_evaluations: 100_000,
            ..Self::default()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::PopulationSize(self.population_size));
        }
        if self.max_evaluations < self.population_size {
            return Err(ConfigError::EvaluationBudget {
                max_evaluations: self.max_evaluations,
                population_size: self.population_size,
            });
        }
        let step = self
            .replacement
            .evaluations_per_iteration(self.population_size);
        if (self.max_evaluations - self.population_size) % step != 0 {
            return Err(ConfigError::UnreachableBudget {
                max_evaluations: self.max_evaluations,
                population_size: self.population_size,
            });
        }
        if let HypervolumeReference::Offset(offset) = self.hypervolume_reference {
            if !offset.is_finite() || offset < 0.0 {
                return Err(ConfigError::HypervolumeOffset(offset));
            }
        }
        if let Some(first) = self.reference_points.first() {
            self.check_reference_points(first.len())?;
            if self.archive_size < self.reference_points.len() {
                return Err(ConfigError::ArchiveSize {
                    archive_size: self.archive_size,
                    reference_points: self.reference_points.len(),
                });
            }
        }
        Ok(())
    }

    /// Validates the configuration against a problem's objective count.
    pub fn validate_for(&self, number_of_objectives: usize) -> Result<(), ConfigError> {
        self.validate()?;
        self.check_reference_points(number_of_objectives)?;
        if let HypervolumeReference::Point(point) = &self.hypervolume_reference {
            if point.len() != number_of_objectives {
                return Err(ConfigError::ReferencePointDimension {
                    index: 0,
                    expected: number_of_objectives,
                    actual: point.len(),
                });
            }
        }
        Ok(())
    }

    fn check_reference_points(&self, expected: usize) -> Result<(), ConfigError> {
        match self
            .reference_points
            .iter()
            .position(|p| p.len() != expected)
        {
            Some(index) => Err(ConfigError::ReferencePointDimension {
                index,
                expected,
                actual: self.reference_points[index].len(),
            }),
            None => Ok(()),
        }
    }
}
