// Errors raised while evaluating a significance test

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which of the two datasets a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dataset {
    First,
    Second,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::First => write!(f, "dataset-1"),
            Dataset::Second => write!(f, "dataset-2"),
        }
    }
}

/// Errors for significance test evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignificanceError {
    #[error("{dataset}: too few data points, need at least {required}, got {actual}")]
    InsufficientSamples {
        dataset: Dataset,
        required: usize,
        actual: usize,
    },

    #[error("{dataset}: value {value} at position {index} must be a finite number greater than 0")]
    InvalidSample {
        dataset: Dataset,
        index: usize,
        value: f64,
    },

    #[error("confidence level {0} out of range (0..1)")]
    InvalidConfidence(f64),

    #[error("it does not make sense to use SND for {0} elements (minimum is 30)")]
    InvalidSndThreshold(u32),

    #[error("{dataset}: {statistic} is not a finite number, values are too large")]
    NonFiniteStatistic {
        dataset: Dataset,
        statistic: &'static str,
    },

    #[error("invalid tuning configuration: {0}")]
    InvalidConfig(String),

    #[error("effective degrees of freedom {dof:.3} is too small for a t-distribution (must be > 2)")]
    DegenerateDegreesOfFreedom { dof: f64 },

    #[error(
        "critical value search did not converge after {iterations} iterations \
         (target={target}, closest coverage={closest})"
    )]
    NonConvergence {
        target: f64,
        closest: f64,
        iterations: usize,
    },
}

/// Result type for significance test operations
pub type Result<T> = std::result::Result<T, SignificanceError>;
