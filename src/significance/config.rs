// Tuning parameters for the critical value search
//
// These never need to change for the confidence levels in common use
// (0.90, 0.95, 0.99) but are exposed so that unusual levels can be handled.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper limit on trapezoids per area computation
pub const MAX_INTERVALS: usize = 10_000_000;

/// Internal factors used by the quadrature and bisection search
///
/// # Example
/// ```
/// use cmpds::significance::TuningConfig;
///
/// let config = TuningConfig::default();
/// assert_eq!(config.intervals, 10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Bisection stops once the computed coverage is within this distance of
    /// the requested confidence level
    ///
    /// Default: 1e-5
    pub tolerance: f64,

    /// Lower end of the user-facing search range
    ///
    /// The range actually searched is widened from
    /// `|lower_bound| + upper_bound` (see [`TuningConfig::search_range`]).
    ///
    /// Default: -3.4
    pub lower_bound: f64,

    /// Upper end of the user-facing search range
    ///
    /// Default: 3.4
    pub upper_bound: f64,

    /// Number of trapezoids used for each area computation
    ///
    /// Default: 10000
    pub intervals: usize,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            lower_bound: -3.4,
            upper_bound: 3.4,
            intervals: 10_000,
        }
    }
}

impl TuningConfig {
    /// Load a tuning configuration from a TOML file
    ///
    /// Missing keys take their default values.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid tuning configuration in {}", path.display()))
    }

    /// Load a tuning configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TuningConfig = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate().map_err(|e| anyhow::anyhow!(e))?;
        Ok(config)
    }

    /// Integration range `(lower, upper)` derived from the tuning bounds
    ///
    /// `upper = 2 * round(|lower_bound| + upper_bound + 0.5)`, `lower = -upper`.
    /// The widening keeps the true critical value bracketed for common
    /// confidence levels.
    pub fn search_range(&self) -> (f64, f64) {
        let upper = 2.0 * (self.lower_bound.abs() + self.upper_bound + 0.5).round_ties_even();
        (-upper, upper)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            ));
        }

        if !(self.lower_bound.is_finite() && self.upper_bound.is_finite()) {
            return Err(format!(
                "bounds must be finite, got [{}, {}]",
                self.lower_bound, self.upper_bound
            ));
        }

        if self.lower_bound >= self.upper_bound {
            return Err(format!(
                "lower bound must be less than upper bound, got [{}, {}]",
                self.lower_bound, self.upper_bound
            ));
        }

        if self.intervals < 2 {
            return Err(format!(
                "intervals must be > 1 for trapezoidal integration, got {}",
                self.intervals
            ));
        }

        if self.intervals > MAX_INTERVALS {
            return Err(format!(
                "intervals must be at most {}, got {}",
                MAX_INTERVALS, self.intervals
            ));
        }

        Ok(())
    }
}
