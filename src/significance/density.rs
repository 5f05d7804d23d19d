// Probability density functions for the two candidate distributions
//
// The engine picks one model per test: Student's-t while the effective
// degrees of freedom are small, the standard normal distribution (SND) once
// they exceed the SND threshold.

use crate::significance::gamma::{gamma, ln_gamma};
use serde::Serialize;
use std::f64::consts::PI;

/// Height of a probability density curve at a point
pub trait Density {
    fn pdf(&self, x: f64) -> f64;
}

impl<F> Density for F
where
    F: Fn(f64) -> f64,
{
    fn pdf(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Distribution used to derive the critical value of a test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistributionModel {
    /// Student's t-distribution with `dof` (> 2) degrees of freedom
    StudentT { dof: f64 },
    /// Standard normal distribution (mean 0, standard deviation 1)
    StandardNormal,
}

impl DistributionModel {
    /// Bind the model to its normalising constant for repeated evaluation
    pub fn density(&self) -> ModelDensity {
        match *self {
            DistributionModel::StudentT { dof } => ModelDensity::StudentT {
                dof,
                norm: student_t_norm(dof),
            },
            DistributionModel::StandardNormal => ModelDensity::StandardNormal,
        }
    }

    pub fn name(&self) -> String {
        match self {
            DistributionModel::StudentT { dof } => format!("t-{}", dof.round_ties_even()),
            DistributionModel::StandardNormal => "standard normal distribution (SND)".to_string(),
        }
    }
}

impl Density for DistributionModel {
    fn pdf(&self, x: f64) -> f64 {
        match *self {
            DistributionModel::StudentT { dof } => pdf_student_t(x, dof),
            DistributionModel::StandardNormal => pdf_standard_normal(x),
        }
    }
}

/// A [`DistributionModel`] with its normalising constant precomputed
///
/// The solver evaluates the density tens of thousands of times per bisection
/// step; the Gamma ratio only depends on the degrees of freedom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelDensity {
    StudentT { dof: f64, norm: f64 },
    StandardNormal,
}

impl Density for ModelDensity {
    fn pdf(&self, x: f64) -> f64 {
        match *self {
            ModelDensity::StudentT { dof, norm } => norm * student_t_kernel(x, dof),
            ModelDensity::StandardNormal => pdf_standard_normal(x),
        }
    }
}

/// Γ((dof+1)/2) / (sqrt(dof·π)·Γ(dof/2))
fn student_t_norm(dof: f64) -> f64 {
    let upper = gamma((dof + 1.0) / 2.0);
    let lower = gamma(dof / 2.0);
    let ratio = if upper.is_finite() && lower.is_finite() {
        upper / lower
    } else {
        (ln_gamma((dof + 1.0) / 2.0) - ln_gamma(dof / 2.0)).exp()
    };
    ratio / (dof * PI).sqrt()
}

/// (1 + x²/dof)^(-(dof+1)/2)
fn student_t_kernel(x: f64, dof: f64) -> f64 {
    (1.0 + x * x / dof).powf(-(dof + 1.0) / 2.0)
}

/// Probability density at `x` of a Student's t-distribution with `dof`
/// degrees of freedom
///
/// Requires `dof > 2`.
pub fn pdf_student_t(x: f64, dof: f64) -> f64 {
    debug_assert!(dof > 2.0, "t-distribution requires dof > 2, got {dof}");
    student_t_norm(dof) * student_t_kernel(x, dof)
}

/// Probability density at `x` of a normal distribution
pub fn pdf_normal(x: f64, stddev: f64, mean: f64) -> f64 {
    let dx = x - mean;
    (-(dx * dx) / (2.0 * stddev * stddev)).exp() / (stddev * (2.0 * PI).sqrt())
}

/// Probability density at `x` of the standard normal distribution
///
/// Same as `pdf_normal(x, 1.0, 0.0)`.
pub fn pdf_standard_normal(x: f64) -> f64 {
    (-(x * x) / 2.0).exp() / (2.0 * PI).sqrt()
}
