//! Error types shared by the whole crate.
//!
//! Configuration faults are reported before an algorithm instance exists;
//! evaluation failures and operator contract violations abort a running
//! algorithm.

/// Invalid or incomplete algorithm configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("population_size must be at least 2, got {0}")]
    PopulationSize(usize),

    #[error("max_evaluations ({max_evaluations}) must be at least population_size ({population_size})")]
    EvaluationBudget {
        max_evaluations: usize,
        population_size: usize,
    },

    #[error("max_evaluations ({max_evaluations}) is not a multiple of population_size ({population_size}); the generational stop condition would never be met exactly")]
    UnreachableBudget {
        max_evaluations: usize,
        population_size: usize,
    },

    #[error("hypervolume offset must be finite and non-negative, got {0}")]
    HypervolumeOffset(f64),

    #[error("reference point {index} has {actual} values, expected {expected}")]
    ReferencePointDimension {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("archive_size ({archive_size}) must be at least the number of reference points ({reference_points})")]
    ArchiveSize {
        archive_size: usize,
        reference_points: usize,
    },

    #[error("problem must declare at least one objective, got {0}")]
    ObjectiveCount(usize),

    #[error("missing {0}")]
    Missing(&'static str),
}

/// Failure raised by a problem while evaluating a solution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("evaluation failed: {message}")]
pub struct EvaluationError {
    pub message: String,
}

impl EvaluationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Top-level error for running a multi-objective algorithm.
#[derive(Debug, thiserror::Error)]
pub enum MoeaError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("{operator} violated its contract: {reason}")]
    OperatorContract {
        operator: &'static str,
        reason: String,
    },

    #[error("evaluator is shut down")]
    EvaluatorShutdown,

    #[error("failed to build evaluator thread pool: {0}")]
    ThreadPool(String),
}

impl MoeaError {
    pub(crate) fn contract(operator: &'static str, reason: impl Into<String>) -> Self {
        MoeaError::OperatorContract {
            operator,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: MoeaError = ConfigError::Missing("selection operator").into();
        assert!(matches!(err, MoeaError::Config(ConfigError::Missing(_))));
        assert_eq!(
            err.to_string(),
            "configuration error: missing selection operator"
        );
    }

    #[test]
    fn test_evaluation_error_is_transparent() {
        let err: MoeaError = EvaluationError::new("x out of domain").into();
        assert_eq!(err.to_string(), "evaluation failed: x out of domain");
    }

    #[test]
    fn test_contract_message() {
        let err = MoeaError::contract("crossover", "returned 3 children");
        assert_eq!(err.to_string(), "crossover violated its contract: returned 3 children");
    }
}
