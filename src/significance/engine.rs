// Significance engine: unpaired observations
//
// Compares the means of two independent samples. The confidence interval
// for the mean difference is md ± z·sdmd, where z comes from a Student's
// t-distribution with Welch-Satterthwaite effective degrees of freedom, or
// from the standard normal distribution once the DOF exceed the SND
// threshold. If the interval does not include zero the datasets differ.
//
// The DOF formula uses (n + 1) in the denominator terms and subtracts 2
// (Jain 1991). Reports from earlier versions were produced with this form.

use crate::significance::config::TuningConfig;
use crate::significance::critical_value::CriticalValueSolver;
use crate::significance::density::DistributionModel;
use crate::significance::error::{Dataset, Result, SignificanceError};
use serde::Serialize;

/// Minimum number of observations per dataset (variance needs n - 1 >= 2)
pub const MIN_SAMPLE_SIZE: usize = 3;

/// Minimum SND threshold: below ~30 DOF the normal approximation is unsound
pub const MIN_SND_THRESHOLD: u32 = 30;

/// Validated set of positive measurements from one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    dataset: Dataset,
    values: Vec<f64>,
}

impl Sample {
    /// Create a sample, checking size and that every value is finite and > 0
    pub fn new(dataset: Dataset, values: Vec<f64>) -> Result<Self> {
        if values.len() < MIN_SAMPLE_SIZE {
            return Err(SignificanceError::InsufficientSamples {
                dataset,
                required: MIN_SAMPLE_SIZE,
                actual: values.len(),
            });
        }

        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(SignificanceError::InvalidSample {
                dataset,
                index,
                value,
            });
        }

        Ok(Self { dataset, values })
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.len() as f64
    }

    /// Σ(x - mean)²
    pub fn sum_of_squared_deviations(&self) -> f64 {
        let mean = self.mean();
        self.values.iter().map(|x| (x - mean) * (x - mean)).sum()
    }

    /// Sample variance Σ(x - mean)² / (n - 1), accumulated about the mean
    ///
    /// Fails if the mean or the sum of squared deviations overflows.
    pub fn variance(&self) -> Result<f64> {
        let mean = self.mean();
        if !mean.is_finite() {
            return Err(SignificanceError::NonFiniteStatistic {
                dataset: self.dataset,
                statistic: "mean",
            });
        }

        let squares = self.sum_of_squared_deviations();
        if !squares.is_finite() {
            return Err(SignificanceError::NonFiniteStatistic {
                dataset: self.dataset,
                statistic: "variance",
            });
        }

        Ok(squares / (self.len() as f64 - 1.0))
    }
}

/// Confidence level strictly between 0 and 1
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConfidenceLevel(f64);

impl ConfidenceLevel {
    pub fn new(level: f64) -> Result<Self> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(SignificanceError::InvalidConfidence(level))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn percent(&self) -> f64 {
        100.0 * self.0
    }
}

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self(0.95)
    }
}

/// Rounded DOF above which the standard normal distribution replaces the
/// t-distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SndThreshold(u32);

impl SndThreshold {
    pub fn new(threshold: u32) -> Result<Self> {
        if threshold < MIN_SND_THRESHOLD {
            return Err(SignificanceError::InvalidSndThreshold(threshold));
        }
        Ok(Self(threshold))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Default for SndThreshold {
    fn default() -> Self {
        Self(MIN_SND_THRESHOLD)
    }
}

/// Outcome of a significance test
///
/// `percent_difference` and `dataset2_is_smaller` are only meaningful when
/// `significant` is true.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub confidence: ConfidenceLevel,
    pub size_a: usize,
    pub size_b: usize,
    pub mean_a: f64,
    pub mean_b: f64,
    pub variance_a: f64,
    pub variance_b: f64,
    /// mean(a) - mean(b)
    pub mean_difference: f64,
    /// Standard deviation of the mean difference
    pub std_error: f64,
    /// Effective degrees of freedom (infinite when both variances are zero)
    pub degrees_of_freedom: f64,
    pub degrees_of_freedom_rounded: f64,
    pub model: DistributionModel,
    pub critical_value: f64,
    pub confidence_interval_lower: f64,
    pub confidence_interval_upper: f64,
    pub crosses_zero: bool,
    pub significant: bool,
    /// 100·|mean_difference| / mean(a)
    pub percent_difference: f64,
    pub dataset2_is_smaller: bool,
}

impl TestResult {
    /// Width of the confidence interval
    pub fn interval_width(&self) -> f64 {
        self.confidence_interval_upper - self.confidence_interval_lower
    }
}

/// Welch-Satterthwaite effective degrees of freedom (n + 1 variant)
///
/// `sa` and `sb` are var/n for each sample of size `na` and `nb`.
fn effective_dof(sa: f64, na: f64, sb: f64, nb: f64) -> f64 {
    let numerator = (sa + sb).powi(2);
    let denominator = (1.0 / (na + 1.0)) * sa * sa + (1.0 / (nb + 1.0)) * sb * sb;
    if denominator == 0.0 {
        // Both variances are zero: the difference carries no sampling
        // uncertainty
        return f64::INFINITY;
    }
    numerator / denominator - 2.0
}

/// Select the distribution for the critical value
pub fn select_model(dof: f64, snd_threshold: SndThreshold) -> Result<DistributionModel> {
    if dof.round_ties_even() > f64::from(snd_threshold.value()) {
        return Ok(DistributionModel::StandardNormal);
    }
    if !(dof > 2.0) {
        return Err(SignificanceError::DegenerateDegreesOfFreedom { dof });
    }
    Ok(DistributionModel::StudentT { dof })
}

/// Decide whether two unpaired samples differ at the given confidence level
///
/// # Example
/// ```
/// use cmpds::significance::{evaluate, ConfidenceLevel, Dataset, Sample, SndThreshold, TuningConfig};
///
/// let a = Sample::new(Dataset::First, vec![10.0, 11.0, 10.5, 10.2, 10.8]).unwrap();
/// let b = Sample::new(Dataset::Second, vec![20.0, 21.0, 20.5, 20.2, 20.8]).unwrap();
/// let result = evaluate(
///     &a,
///     &b,
///     ConfidenceLevel::new(0.95).unwrap(),
///     &TuningConfig::default(),
///     SndThreshold::default(),
/// )
/// .unwrap();
/// assert!(result.significant);
/// assert!(!result.dataset2_is_smaller);
/// ```
pub fn evaluate(
    sample_a: &Sample,
    sample_b: &Sample,
    confidence: ConfidenceLevel,
    tuning: &TuningConfig,
    snd_threshold: SndThreshold,
) -> Result<TestResult> {
    tuning.validate().map_err(SignificanceError::InvalidConfig)?;
    debug_assert!(sample_a.len() >= MIN_SAMPLE_SIZE && sample_b.len() >= MIN_SAMPLE_SIZE);

    let cl = confidence.value();
    tracing::debug!("a: {:>3} {:?}", sample_a.len(), sample_a.values());
    tracing::debug!("b: {:>3} {:?}", sample_b.len(), sample_b.values());
    tracing::debug!("confidence level: {:.1}%", confidence.percent());

    let na = sample_a.len() as f64;
    let nb = sample_b.len() as f64;

    // means
    let ma = sample_a.mean();
    let mb = sample_b.mean();
    tracing::debug!("mean a: {:.3}", ma);
    tracing::debug!("mean b: {:.3}", mb);

    // variances
    tracing::debug!("sum (a - mean a)^2: {:.3}", sample_a.sum_of_squared_deviations());
    tracing::debug!("sum (b - mean b)^2: {:.3}", sample_b.sum_of_squared_deviations());
    let var_a = sample_a.variance()?;
    let var_b = sample_b.variance()?;
    tracing::debug!("variance a: {:.3}", var_a);
    tracing::debug!("variance b: {:.3}", var_b);
    tracing::debug!("stddev a: {:.3}", var_a.sqrt());
    tracing::debug!("stddev b: {:.3}", var_b.sqrt());

    // mean difference and its standard deviation
    let md = ma - mb;
    let sa = var_a / na;
    let sb = var_b / nb;
    let sdmd = (sa + sb).sqrt();
    tracing::debug!("mean diff: {:.3}", md);
    tracing::debug!("stddev of the mean diff: {:.3}", sdmd);

    // effective degrees of freedom
    let dof = effective_dof(sa, na, sb, nb);
    let dof_rounded = dof.round_ties_even();
    tracing::debug!("effective DOF: {:.2}", dof);
    tracing::debug!("effective DOF (rounded): {}", dof_rounded);

    let solver = CriticalValueSolver::from_tuning(tuning)
        .with_verbose(tracing::enabled!(tracing::Level::TRACE));
    tracing::debug!("internal threshold: {:e}", tuning.tolerance);
    tracing::debug!("internal lower bound: {}", tuning.lower_bound);
    tracing::debug!("internal upper bound: {}", tuning.upper_bound);
    tracing::debug!("internal intervals: {}", tuning.intervals);
    tracing::debug!("internal minval: {}", solver.lower_bound);
    tracing::debug!("internal maxval: {}", -solver.lower_bound);

    let model = select_model(dof, snd_threshold)?;
    tracing::debug!("use {}", model.name());

    let z = solver.solve(cl, &model.density())?;
    tracing::debug!(
        "{:.3}-quantile of {} with {} degrees of freedom: {:.2}",
        cl + (1.0 - cl) / 2.0,
        model.name(),
        dof_rounded,
        z
    );

    // confidence interval for the mean difference
    let lower = md - z * sdmd;
    let upper = md + z * sdmd;
    tracing::debug!(
        "{:.1}% confidence interval for difference: [{:.3} .. {:.3}]",
        confidence.percent(),
        lower,
        upper
    );

    // A zero mean difference is never significant, even when both
    // variances are zero and the interval collapses to the point 0.
    let crosses_zero = (lower < 0.0 && 0.0 < upper) || md == 0.0;
    let significant = !crosses_zero;
    tracing::debug!("crosses zero: {}", crosses_zero);
    tracing::debug!("reject the null hypothesis: {}", significant);

    let percent_difference = 100.0 * md.abs() / ma;
    tracing::debug!("percentage: {}", percent_difference);

    Ok(TestResult {
        confidence,
        size_a: sample_a.len(),
        size_b: sample_b.len(),
        mean_a: ma,
        mean_b: mb,
        variance_a: var_a,
        variance_b: var_b,
        mean_difference: md,
        std_error: sdmd,
        degrees_of_freedom: dof,
        degrees_of_freedom_rounded: dof_rounded,
        model,
        critical_value: z,
        confidence_interval_lower: lower,
        confidence_interval_upper: upper,
        crosses_zero,
        significant,
        percent_difference,
        // dataset-2 is only "larger" when the whole interval is negative
        dataset2_is_smaller: upper >= 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(dataset: Dataset, values: &[f64]) -> Sample {
        Sample::new(dataset, values.to_vec()).unwrap()
    }

    #[test]
    fn test_sample_requires_three_values() {
        let err = Sample::new(Dataset::First, vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            SignificanceError::InsufficientSamples {
                dataset: Dataset::First,
                required: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_sample_rejects_non_positive_values() {
        let err = Sample::new(Dataset::Second, vec![1.0, 0.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            SignificanceError::InvalidSample {
                dataset: Dataset::Second,
                index: 1,
                ..
            }
        ));
        assert!(Sample::new(Dataset::First, vec![1.0, -2.0, 3.0]).is_err());
        assert!(Sample::new(Dataset::First, vec![1.0, f64::NAN, 3.0]).is_err());
        assert!(Sample::new(Dataset::First, vec![1.0, f64::INFINITY, 3.0]).is_err());
    }

    #[test]
    fn test_sample_statistics() {
        let s = sample(Dataset::First, &[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(s.mean(), 5.0);
        // 9 + 1 + 1 + 9
        assert_eq!(s.sum_of_squared_deviations(), 20.0);
        assert!((s.variance().unwrap() - 20.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.dataset(), Dataset::First);
        assert!(!s.is_empty());
    }

    #[test]
    fn test_constant_sample_has_zero_variance() {
        assert_eq!(sample(Dataset::First, &[10.0, 10.0, 10.0]).variance().unwrap(), 0.0);
        assert_eq!(
            sample(Dataset::First, &[0.1, 0.1, 0.1, 0.1, 0.1]).variance().unwrap(),
            0.0
        );
    }

    #[test]
    fn test_variance_keeps_precision_for_large_offsets() {
        // Nanosecond-scale timings: Σx² - n·mean² cancels to garbage here
        let s = sample(Dataset::First, &[1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0, 1e9 + 4.0]);
        assert!((s.variance().unwrap() - 5.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_variance_overflow_is_an_error() {
        let s = sample(Dataset::Second, &[1e155, 2e155, 3e155]);
        assert_eq!(
            s.variance().unwrap_err(),
            SignificanceError::NonFiniteStatistic {
                dataset: Dataset::Second,
                statistic: "variance",
            }
        );

        let s = sample(Dataset::First, &[f64::MAX, f64::MAX, f64::MAX]);
        assert!(matches!(
            s.variance(),
            Err(SignificanceError::NonFiniteStatistic {
                statistic: "mean",
                ..
            })
        ));
    }

    #[test]
    fn test_evaluate_large_offset_samples_do_not_differ() {
        let a = [1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0, 1e9 + 4.0];
        let b = [1e9 + 1.5, 1e9 + 2.5, 1e9 + 3.5, 1e9 + 4.5];
        let result = evaluate(
            &sample(Dataset::First, &a),
            &sample(Dataset::Second, &b),
            ConfidenceLevel::default(),
            &TuningConfig::default(),
            SndThreshold::default(),
        )
        .unwrap();
        assert!((result.variance_a - 5.0 / 3.0).abs() < 1e-6);
        assert!((result.variance_b - 5.0 / 3.0).abs() < 1e-6);
        assert!(result.degrees_of_freedom.is_finite());
        assert!(matches!(result.model, DistributionModel::StudentT { .. }));
        assert!(result.crosses_zero);
        assert!(!result.significant);
    }

    #[test]
    fn test_evaluate_reports_overflowing_variance() {
        let a = [1e155, 2e155, 3e155];
        let b = [1.5e155, 2.5e155, 3.5e155];
        let err = evaluate(
            &sample(Dataset::First, &a),
            &sample(Dataset::Second, &b),
            ConfidenceLevel::default(),
            &TuningConfig::default(),
            SndThreshold::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SignificanceError::NonFiniteStatistic { .. }));
    }

    #[test]
    fn test_confidence_level_bounds() {
        assert!(ConfidenceLevel::new(0.95).is_ok());
        assert!(ConfidenceLevel::new(0.0).is_err());
        assert!(ConfidenceLevel::new(1.0).is_err());
        assert!(ConfidenceLevel::new(f64::NAN).is_err());
        assert_eq!(ConfidenceLevel::default().value(), 0.95);
        assert!((ConfidenceLevel::new(0.99).unwrap().percent() - 99.0).abs() < 1e-12);
    }

    #[test]
    fn test_snd_threshold_minimum() {
        assert_eq!(SndThreshold::default().value(), 30);
        assert!(SndThreshold::new(32).is_ok());
        assert_eq!(
            SndThreshold::new(29).unwrap_err(),
            SignificanceError::InvalidSndThreshold(29)
        );
    }

    #[test]
    fn test_effective_dof_equal_samples() {
        // Equal n and variance: ratio = 2(n + 1), minus 2 gives 2n
        let dof = effective_dof(0.5, 10.0, 0.5, 10.0);
        assert!((dof - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_effective_dof_zero_variance_is_infinite() {
        assert_eq!(effective_dof(0.0, 3.0, 0.0, 3.0), f64::INFINITY);
    }

    #[test]
    fn test_select_model() {
        let threshold = SndThreshold::default();
        assert_eq!(
            select_model(18.47, threshold).unwrap(),
            DistributionModel::StudentT { dof: 18.47 }
        );
        // 30.4 rounds to 30, which does not exceed the threshold
        assert_eq!(
            select_model(30.4, threshold).unwrap(),
            DistributionModel::StudentT { dof: 30.4 }
        );
        assert_eq!(
            select_model(30.6, threshold).unwrap(),
            DistributionModel::StandardNormal
        );
        assert_eq!(
            select_model(f64::INFINITY, threshold).unwrap(),
            DistributionModel::StandardNormal
        );
    }

    #[test]
    fn test_select_model_rejects_degenerate_dof() {
        assert_eq!(
            select_model(2.0, SndThreshold::default()).unwrap_err(),
            SignificanceError::DegenerateDegreesOfFreedom { dof: 2.0 }
        );
        assert!(select_model(f64::NAN, SndThreshold::default()).is_err());
    }

    #[test]
    fn test_evaluate_rejects_invalid_tuning() {
        let a = sample(Dataset::First, &[1.0, 2.0, 3.0]);
        let tuning = TuningConfig {
            intervals: 1,
            ..TuningConfig::default()
        };
        let err = evaluate(
            &a,
            &a,
            ConfidenceLevel::default(),
            &tuning,
            SndThreshold::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SignificanceError::InvalidConfig(_)));
    }

    #[test]
    fn test_evaluate_reports_degenerate_dof() {
        // One constant sample of size 3: dof = (n + 1) - 2 = 2
        let a = sample(Dataset::First, &[1.0, 2.0, 3.0]);
        let b = sample(Dataset::Second, &[5.0, 5.0, 5.0]);
        let err = evaluate(
            &a,
            &b,
            ConfidenceLevel::default(),
            &TuningConfig::default(),
            SndThreshold::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SignificanceError::DegenerateDegreesOfFreedom { .. }
        ));
    }

    #[test]
    fn test_evaluate_large_samples_use_snd() {
        let a: Vec<f64> = (0..40).map(|i| 10.0 + (i % 5) as f64).collect();
        let b: Vec<f64> = (0..40).map(|i| 20.0 + (i % 5) as f64).collect();
        let result = evaluate(
            &sample(Dataset::First, &a),
            &sample(Dataset::Second, &b),
            ConfidenceLevel::new(0.99).unwrap(),
            &TuningConfig::default(),
            SndThreshold::default(),
        )
        .unwrap();
        assert_eq!(result.model, DistributionModel::StandardNormal);
        assert!((result.degrees_of_freedom - 80.0).abs() < 1e-9);
        assert!((result.critical_value - 2.576).abs() < 1e-3);
        assert!(result.significant);
        assert!(!result.dataset2_is_smaller);
        assert!((result.percent_difference - 83.333).abs() < 1e-3);
    }

    #[test]
    fn test_evaluate_raised_threshold_keeps_t_model() {
        let a: Vec<f64> = (0..40).map(|i| 10.0 + (i % 5) as f64).collect();
        let result = evaluate(
            &sample(Dataset::First, &a),
            &sample(Dataset::Second, &a),
            ConfidenceLevel::default(),
            &TuningConfig::default(),
            SndThreshold::new(100).unwrap(),
        )
        .unwrap();
        assert!(matches!(result.model, DistributionModel::StudentT { .. }));
        assert!(!result.significant);
    }
}
