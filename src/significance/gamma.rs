// Gamma function
//
// Integer arguments use the exact factorial identity Γ(n) = (n-1)!.
// Everything else goes through the Lanczos approximation (Numerical Recipes
// in C, p. 214), evaluated in the log domain to avoid intermediate overflow.
//
//   Γ(1/2) = 1.77245385091
//   Γ(3/2) = 0.886226925453
//   Γ(5/2) = 1.32934038818
//   Γ(7/2) = 3.32335097045
//   Γ(4)   = 6.0

/// Lanczos series coefficients for g = 5.5 (six terms)
#[allow(clippy::excessive_precision)]
const LANCZOS_COEFFICIENTS: [f64; 6] = [
    76.18009172947146,
    -86.50532032941677,
    24.01409824083091,
    -1.231739572450155,
    0.1208650973866179e-2,
    -0.5395239384953e-5,
];

#[allow(clippy::excessive_precision)]
const LANCZOS_SERIES_BASE: f64 = 1.000000000190015;

/// sqrt(2π)
#[allow(clippy::excessive_precision)]
const SQRT_TWO_PI: f64 = 2.5066282746310005;

/// Γ(172) overflows f64, so larger integers take the log-domain path
const MAX_FACTORIAL_ARG: f64 = 171.0;

/// Evaluate Γ(x) for x > 0
///
/// Integer arguments return exactly (x-1)!. Behaviour for x <= 0 or
/// non-finite x is unspecified; callers only pass dof/2 and (dof+1)/2.
pub fn gamma(x: f64) -> f64 {
    debug_assert!(x > 0.0, "gamma requires x > 0, got {x}");

    if x.fract() == 0.0 && x <= MAX_FACTORIAL_ARG {
        let mut product = 1.0;
        let mut i = 2.0;
        while i < x {
            product *= i;
            i += 1.0;
        }
        return product;
    }

    ln_gamma(x).exp()
}

/// Evaluate ln Γ(x) for x > 0 using the Lanczos approximation
pub fn ln_gamma(x: f64) -> f64 {
    let shifted = x + 5.5;
    let tmp = shifted - (x + 0.5) * shifted.ln();

    let mut series = LANCZOS_SERIES_BASE;
    let mut denom = x;
    for coeff in LANCZOS_COEFFICIENTS {
        denom += 1.0;
        series += coeff / denom;
    }

    -tmp + (SQRT_TWO_PI * series / x).ln()
}
