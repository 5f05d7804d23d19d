// Significance testing for unpaired observations
//
// Decides whether two independent datasets differ at a given confidence
// level. The critical value is derived numerically from the probability
// density of the selected distribution, so no t-table or z-table is needed:
//
// - gamma: Gamma function (exact factorial for integers, Lanczos otherwise)
// - density: Student's-t and standard normal densities
// - quadrature: trapezoidal integration of a density
// - critical_value: bounded bisection inverting the two-tailed coverage
// - engine: sample statistics, Welch-Satterthwaite DOF, interval, verdict
//
// Scientific Foundation:
// Jain, R. (1991). The Art of Computer Systems Performance Analysis.
//     John Wiley and Sons, New York. Section 13.4.2 (unpaired observations).
//
// Press, W. H., et al. (1992). Numerical Recipes in C (2nd ed.), p. 214.
//     Lanczos approximation of ln Gamma.

mod config;
mod critical_value;
mod density;
mod engine;
mod error;
mod gamma;
mod quadrature;

pub use config::{TuningConfig, MAX_INTERVALS};
pub use critical_value::CriticalValueSolver;
pub use density::{
    pdf_normal, pdf_standard_normal, pdf_student_t, Density, DistributionModel, ModelDensity,
};
pub use engine::{
    evaluate, select_model, ConfidenceLevel, Sample, SndThreshold, TestResult, MIN_SAMPLE_SIZE,
    MIN_SND_THRESHOLD,
};
pub use error::{Dataset, Result, SignificanceError};
pub use gamma::{gamma, ln_gamma};
pub use quadrature::integrate;
