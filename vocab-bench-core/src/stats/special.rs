use std::f64::consts::SQRT_2;

use special::{Error, Gamma};

/// Natural logarithm of the gamma function (of its absolute value for
/// negative arguments).
pub fn ln_gamma(x: f64) -> f64 {
	x.ln_gamma().0
}

/// Binomial coefficient `C(n, k)` as a float.
///
/// Overflows to `+inf` for large arguments instead of failing, and is 0 when `k > n`.
pub fn binomial_coefficient(n: u64, k: u64) -> f64 {
	if k > n {
		return 0.0;
	}
	let k = k.min(n - k);
	if k == 0 {
		return 1.0;
	}
	// Small k: multiplicative form, exact up to rounding
	if k <= 30 {
		let mut c = 1.0;
		for i in 0..k {
			c = c * (n - i) as f64 / (i + 1) as f64;
		}
		return c;
	}
	let (n, k) = (n as f64, k as f64);
	(ln_gamma(n + 1.0) - ln_gamma(k + 1.0) - ln_gamma(n - k + 1.0)).exp()
}

/// `k!` as a float (`+inf` above 170).
pub fn factorial(k: u64) -> f64 {
	(1..=k).fold(1.0, |acc, i| acc * i as f64)
}

/// Complementary error function.
pub fn erfc(x: f64) -> f64 {
	x.compl_error()
}

/// Standard normal cumulative distribution function.
pub fn normal_cdf(x: f64) -> f64 {
	0.5 * erfc(-x / SQRT_2)
}

#[cfg(test)]
mod tests {
	use std::f64::consts::PI;

	use super::*;

	#[test]
	fn ln_gamma_matches_factorials() {
		// Γ(n+1) = n!
		assert!((ln_gamma(1.0)).abs() < 1e-12);
		assert!((ln_gamma(2.0)).abs() < 1e-12);
		assert!((ln_gamma(6.0) - 120f64.ln()).abs() < 1e-12);
		assert!((ln_gamma(11.0) - 3_628_800f64.ln()).abs() < 1e-10);
		// Γ(1/2) = sqrt(pi)
		assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-12);
	}

	#[test]
	fn binomial_coefficient_small_and_large() {
		assert_eq!(binomial_coefficient(5, 2), 10.0);
		assert_eq!(binomial_coefficient(20, 0), 1.0);
		assert_eq!(binomial_coefficient(20, 20), 1.0);
		assert_eq!(binomial_coefficient(3, 4), 0.0);
		let c = binomial_coefficient(100, 50);
		assert!((c / 1.008_913_445_455_641_9e29 - 1.0).abs() < 1e-9);
		assert!(binomial_coefficient(2_000_000, 1_000_000).is_infinite());
	}

	#[test]
	fn erfc_reference_points() {
		assert_eq!(erfc(0.0), 1.0);
		assert!((erfc(1.0) - 0.157_299_207_050_285_1).abs() < 1e-13);
		assert!((erfc(-1.0) - 1.842_700_792_949_714_9).abs() < 1e-13);
		assert!(erfc(30.0) < 1e-300);
	}

	#[test]
	fn factorial_values() {
		assert_eq!(factorial(0), 1.0);
		assert_eq!(factorial(5), 120.0);
		assert!(factorial(171).is_infinite());
	}

	#[test]
	fn normal_cdf_reference_points() {
		assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
		assert!((normal_cdf(1.96) - 0.975_002_1).abs() < 1e-6);
		assert!((normal_cdf(-1.0) - 0.158_655_25).abs() < 1e-6);
		assert!((normal_cdf(0.5) - 0.691_462_461_274_013_1).abs() < 1e-12);
		assert!(normal_cdf(40.0) <= 1.0);
		assert!(normal_cdf(-40.0) >= 0.0);
	}
}
