// Area under a density curve by the trapezoidal rule
//
// Fixed-width slices with no adaptive refinement. Precision is governed
// entirely by the number of intervals.

use crate::significance::density::Density;

/// Approximate the integral of `density` over `[x1, x2]`
///
/// Walks the interval left to right in `intervals` equal slices. Each slice
/// contributes a rectangle at the previous height plus the triangle between
/// the previous and current heights.
///
/// # Example
/// ```
/// use cmpds::significance::{integrate, pdf_standard_normal};
///
/// let mass = integrate(-10.0, 10.0, 10_000, &pdf_standard_normal);
/// assert!((mass - 1.0).abs() < 1e-4);
/// ```
pub fn integrate<D>(x1: f64, x2: f64, intervals: usize, density: &D) -> f64
where
    D: Density + ?Sized,
{
    debug_assert!(x2 > x1, "integration bounds out of order: {x1} >= {x2}");
    debug_assert!(intervals > 1, "need more than one interval, got {intervals}");

    let width = (x2 - x1) / intervals as f64;
    let mut total_area = 0.0;
    let mut previous = density.pdf(x1);

    for i in 1..=intervals {
        let current = density.pdf(x1 + width * i as f64);
        let rectangle = width * previous;
        let triangle = 0.5 * width * (current - previous);
        total_area += rectangle + triangle;
        previous = current;
    }

    total_area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::significance::density::{pdf_standard_normal, pdf_student_t};

    #[test]
    fn test_standard_normal_total_mass() {
        let area = integrate(-10.0, 10.0, 10_000, &pdf_standard_normal);
        assert!((area - 1.0).abs() < 1e-4, "area = {}", area);
    }

    #[test]
    fn test_standard_normal_half_mass() {
        let area = integrate(-14.0, 0.0, 10_000, &pdf_standard_normal);
        assert!((area - 0.5).abs() < 1e-6, "area = {}", area);
    }

    #[test]
    fn test_standard_normal_one_sigma() {
        // P(-1 < Z < 1) = 0.682689...
        let area = integrate(-1.0, 1.0, 10_000, &pdf_standard_normal);
        assert!((area - 0.682_689_492).abs() < 1e-6, "area = {}", area);
    }

    #[test]
    fn test_student_t_total_mass() {
        // Heavy tails: t-10 still leaves a little mass outside [-14, 14]
        let area = integrate(-14.0, 14.0, 10_000, &|x| pdf_student_t(x, 10.0));
        assert!((area - 1.0).abs() < 1e-6, "area = {}", area);
    }

    #[test]
    fn test_linear_function_is_exact() {
        // Trapezoids integrate straight lines without error
        let area = integrate(0.0, 2.0, 4, &|x: f64| 3.0 * x + 1.0);
        assert!((area - 8.0).abs() < 1e-12, "area = {}", area);
    }

    #[test]
    fn test_constant_function() {
        let area = integrate(-1.5, 2.5, 2, &|_: f64| 0.5);
        assert!((area - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_more_intervals_improve_accuracy() {
        let exact = 1.0 / 3.0;
        let coarse = integrate(0.0, 1.0, 4, &|x: f64| x * x);
        let fine = integrate(0.0, 1.0, 400, &|x: f64| x * x);
        assert!((fine - exact).abs() < (coarse - exact).abs());
    }
}
