// Critical value search by bisection
//
// Finds the symmetric bound z such that the area under a density between
// -z and z equals the requested confidence level. The one-sided area Q is
// integrated from a far-left bound up to z, and the two-tailed coverage is
// cp = 1 - 2(1 - Q).
//
// The bisection runs over an internal coordinate `mid` in [0, 2·half_width]
// mapped to z = mid - half_width. It is bounded: if the coverage never comes
// within tolerance of the target (the root is not bracketed by the search
// range) the search reports non-convergence instead of returning a boundary
// value.

use crate::significance::config::TuningConfig;
use crate::significance::density::Density;
use crate::significance::error::{Result, SignificanceError};
use crate::significance::quadrature::integrate;

/// Bisection solver for the two-tailed critical value of a density
#[derive(Debug, Clone, PartialEq)]
pub struct CriticalValueSolver {
    /// Stop once |coverage - target| <= tolerance
    pub tolerance: f64,
    /// z is searched over [-half_width, half_width]
    pub half_width: f64,
    /// Left end of every area computation
    pub lower_bound: f64,
    /// Trapezoids per area computation
    pub intervals: usize,
    /// Emit a trace event for every bisection step
    pub verbose: bool,
}

impl CriticalValueSolver {
    pub fn new(tolerance: f64, half_width: f64, lower_bound: f64, intervals: usize) -> Self {
        Self {
            tolerance,
            half_width,
            lower_bound,
            intervals,
            verbose: false,
        }
    }

    /// Build a solver over the widened search range of a tuning configuration
    ///
    /// With the defaults the range is [-14, 14] and z is searched in [-7, 7].
    pub fn from_tuning(tuning: &TuningConfig) -> Self {
        let (lower, upper) = tuning.search_range();
        Self::new(tuning.tolerance, upper / 2.0, lower, tuning.intervals)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Iteration ceiling: enough halvings of the search range to get below
    /// the tolerance, plus one
    pub fn max_iterations(&self) -> usize {
        let halvings = (2.0 * self.half_width / self.tolerance).log2().ceil();
        halvings.max(0.0) as usize + 1
    }

    /// Two-tailed coverage of `density` over [-z, z]
    pub fn coverage<D>(&self, z: f64, density: &D) -> f64
    where
        D: Density + ?Sized,
    {
        let q = integrate(self.lower_bound, z, self.intervals, density);
        1.0 - 2.0 * (1.0 - q)
    }

    /// Find z >= 0 whose two-tailed coverage under `density` is within
    /// tolerance of `probability`
    ///
    /// # Example
    /// ```
    /// use cmpds::significance::{CriticalValueSolver, DistributionModel, TuningConfig};
    ///
    /// let solver = CriticalValueSolver::from_tuning(&TuningConfig::default());
    /// let z = solver.solve(0.95, &DistributionModel::StandardNormal).unwrap();
    /// assert!((z - 1.96).abs() < 1e-3);
    /// ```
    pub fn solve<D>(&self, probability: f64, density: &D) -> Result<f64>
    where
        D: Density + ?Sized,
    {
        if !(probability > 0.0 && probability < 1.0) {
            return Err(SignificanceError::InvalidConfidence(probability));
        }

        let max_top = 2.0 * self.half_width;
        let mut top = max_top;
        let mut bot = 0.0;
        let mut closest = f64::NAN;
        let max_iterations = self.max_iterations();

        for iteration in 1..=max_iterations {
            let mid = bot + (top - bot) / 2.0;
            let z = mid - self.half_width;
            let q = integrate(self.lower_bound, z, self.intervals, density);
            let cp = 1.0 - 2.0 * (1.0 - q);
            let diff = (cp - probability).abs();

            if self.verbose {
                tracing::trace!(
                    "i={}, p={}, cp={}, t={:e}, mt={}, mv={}, intervals={}, top={}, bot={}, mid={}, z={}, q={}",
                    iteration,
                    probability,
                    cp,
                    self.tolerance,
                    max_top,
                    self.lower_bound,
                    self.intervals,
                    top,
                    bot,
                    mid,
                    z,
                    q
                );
            }

            if diff <= self.tolerance {
                return Ok(z.max(0.0));
            }

            if closest.is_nan() || diff < (closest - probability).abs() {
                closest = cp;
            }

            if probability < cp {
                // Root is to the left
                top = mid;
            } else if probability > cp {
                // Root is to the right
                bot = mid;
            } else {
                return Ok(z.max(0.0));
            }
        }

        Err(SignificanceError::NonConvergence {
            target: probability,
            closest,
            iterations: max_iterations,
        })
    }
}
